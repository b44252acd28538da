//! Category buckets and interactive narrowing.

use std::collections::{BTreeSet, HashSet};

use kizuna_core::{Catalog, Item, ItemIndex};

use crate::avl::AvlMap;
use crate::error::{SearchError, SearchResult};

/// Category label to the items carrying it, ordered by label.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    buckets: AvlMap<String, Vec<ItemIndex>>,
}

impl CategoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every item in `catalog`. Each bucket lists its items in catalog
    /// order.
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::new();
        for category in catalog.unique_categories() {
            index.buckets.get_or_insert_default(category.to_string());
        }
        for (handle, item) in catalog.iter() {
            for category in item.categories() {
                index.insert(category, handle);
            }
        }
        log::debug!(
            "category index: {} categories, tree height {}",
            index.len(),
            index.buckets.height()
        );
        index
    }

    /// Append `item` to the bucket for `category`, creating it if needed.
    pub fn insert(&mut self, category: &str, item: ItemIndex) {
        self.buckets.get_or_insert_default(category.to_string()).push(item);
    }

    /// Items in `category`; empty for an unknown label.
    pub fn bucket(&self, category: &str) -> &[ItemIndex] {
        self.buckets
            .get(&category.to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.buckets.contains(&category.to_string())
    }

    /// Labels in ascending order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Labels with their bucket sizes, in ascending label order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Narrows the catalog one category at a time.
///
/// Starts out matching every item. Each [`select`](Self::select) keeps only
/// the items that also carry the chosen category, so the result set after
/// several selections is the intersection of their buckets.
#[derive(Debug, Clone)]
pub struct CategoryFilter<'a> {
    catalog: &'a Catalog,
    index: &'a CategoryIndex,
    selected: Vec<String>,
    results: Vec<ItemIndex>,
}

impl<'a> CategoryFilter<'a> {
    pub fn new(catalog: &'a Catalog, index: &'a CategoryIndex) -> Self {
        Self {
            catalog,
            index,
            selected: Vec::new(),
            results: catalog.iter().map(|(handle, _)| handle).collect(),
        }
    }

    /// Restrict the results to items in `category`.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if the category is not indexed or is
    /// already part of the selection.
    pub fn select(&mut self, category: &str) -> SearchResult<usize> {
        if !self.index.contains(category) {
            return Err(SearchError::UnknownCategory(category.to_string()));
        }
        if self.selected.iter().any(|s| s == category) {
            return Err(SearchError::AlreadySelected(category.to_string()));
        }

        let bucket: HashSet<ItemIndex> = self.index.bucket(category).iter().copied().collect();
        self.results.retain(|handle| bucket.contains(handle));
        self.selected.push(category.to_string());
        log::debug!(
            "selected {category:?}: {} items remain after {} selections",
            self.results.len(),
            self.selected.len()
        );
        Ok(self.results.len())
    }

    /// Categories chosen so far, in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Current result handles, in catalog order.
    pub fn results(&self) -> &[ItemIndex] {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Categories that still occur among the results and have not been
    /// selected, sorted.
    pub fn available_categories(&self) -> Vec<&'a str> {
        let mut available = BTreeSet::new();
        for item in self.items() {
            for category in item.categories() {
                if !self.selected.contains(category) {
                    available.insert(category.as_str());
                }
            }
        }
        available.into_iter().collect()
    }

    /// Results ordered by rating, highest first; equal ratings by name.
    pub fn ranked(&self) -> Vec<&'a Item> {
        let mut items: Vec<&Item> = self.items().collect();
        items.sort_by(|a, b| {
            b.rating()
                .total_cmp(&a.rating())
                .then_with(|| a.name().cmp(b.name()))
        });
        items
    }

    /// Drop every selection and match the whole catalog again.
    pub fn reset(&mut self) {
        *self = Self::new(self.catalog, self.index);
    }

    fn items(&self) -> impl Iterator<Item = &'a Item> + '_ {
        let catalog = self.catalog;
        self.results.iter().filter_map(move |&handle| catalog.get(handle))
    }
}
