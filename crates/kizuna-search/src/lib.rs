//! Lookup structures over the kizuna catalog.
//!
//! [`PrefixIndex`] answers type-ahead queries on item names and
//! [`CategoryIndex`] groups items by category label on top of the
//! self-balancing [`AvlMap`]. Both hold [`ItemIndex`](kizuna_core::ItemIndex)
//! handles rather than references, so they can be built once and kept next
//! to the catalog that issued the handles.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod avl;
pub mod category;
pub mod error;
pub mod trie;

pub use avl::AvlMap;
pub use category::{CategoryFilter, CategoryIndex};
pub use error::{SearchError, SearchResult};
pub use trie::{PrefixIndex, Suggestion};

use kizuna_core::{Catalog, ItemIndex};

/// Prefix index over every item name in `catalog`.
pub fn name_index(catalog: &Catalog) -> PrefixIndex<ItemIndex> {
    let mut index = PrefixIndex::new();
    for (handle, item) in catalog.iter() {
        index.insert(item.name(), handle);
    }
    log::debug!(
        "name index holds {} names in {} nodes",
        index.len(),
        index.node_count()
    );
    index
}
