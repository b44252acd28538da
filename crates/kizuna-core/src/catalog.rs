//! The authoritative item store.
//!
//! Every other structure (the prefix index, the category index) refers to
//! items through [`ItemIndex`] handles issued here. The catalog never removes
//! or reorders items, so handles stay valid for its whole lifetime.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{Item, ItemIndex};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    by_name: HashMap<String, ItemIndex>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Returns `None` (and leaves the catalog untouched) when
    /// an item with the same name is already present.
    pub fn insert(&mut self, item: Item) -> Option<ItemIndex> {
        match self.try_insert(item) {
            Ok(index) => Some(index),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    pub fn try_insert(&mut self, item: Item) -> Result<ItemIndex> {
        if self.by_name.contains_key(item.name()) {
            return Err(Error::Duplicate {
                entity: "item",
                name: item.name().to_string(),
            });
        }
        let index = ItemIndex::new(self.items.len());
        self.by_name.insert(item.name().to_string(), index);
        self.items.push(item);
        Ok(index)
    }

    pub fn get(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index.as_usize())
    }

    /// Exact, case-sensitive lookup by name.
    pub fn index_of(&self, name: &str) -> Option<ItemIndex> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Item> {
        self.index_of(name).and_then(|i| self.get(i))
    }

    /// Like [`Self::find`], with a typed error for a missing name.
    pub fn require(&self, name: &str) -> Result<&Item> {
        self.find(name).ok_or_else(|| Error::NotFound {
            entity: "item",
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items paired with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemIndex, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemIndex::new(i), item))
    }

    /// Distinct category labels in order of first appearance.
    pub fn unique_categories(&self) -> Vec<&str> {
        first_seen(self.items.iter().flat_map(|i| i.categories().iter()))
    }

    /// Distinct type labels in order of first appearance.
    pub fn unique_kinds(&self) -> Vec<&str> {
        first_seen(self.items.iter().map(|i| i.kind()))
    }
}

fn first_seen<'a, I, S>(values: I) -> Vec<&'a str>
where
    I: Iterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let mut seen = std::collections::HashSet::new();
    values
        .map(|v: &'a S| -> &'a str { v.as_ref() })
        .filter(|v| seen.insert(*v))
        .collect()
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
