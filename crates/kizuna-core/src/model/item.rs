use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::model::ids::ItemId;

/// A single catalog record.
///
/// The item's `name` is its identity: equality, ordering and hashing all look
/// at the name and nothing else, so two records with the same name are the
/// same item no matter what their source identifiers say.
///
/// Category labels are kept sorted and free of duplicates. Overlap scoring
/// walks two category lists in lockstep and relies on that order.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    categories: Vec<String>,
    #[serde(rename = "type")]
    kind: String,
    episodes: u32,
    rating: f32,
    popularity: u64,
}

impl Item {
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            categories: Vec::new(),
            kind: String::new(),
            episodes: 0,
            rating: 0.0,
            popularity: 0,
        }
    }

    /// Set the category labels. Labels are trimmed, empty ones dropped, and
    /// the result sorted and deduplicated.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: Vec<String> = categories
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_episodes(mut self, episodes: u32) -> Self {
        self.episodes = episodes;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = popularity;
        self
    }

    pub const fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category labels in sorted order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Type label (TV, Movie, OVA, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub const fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Rating on a 0-10 scale.
    pub const fn rating(&self) -> f32 {
        self.rating
    }

    /// Popularity as a member count.
    pub const fn popularity(&self) -> u64 {
        self.popularity
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .is_ok()
    }

    /// Number of category labels this item shares with `other`.
    pub fn shared_categories(&self, other: &Self) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        let (a, b) = (&self.categories, &other.categories);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample(name: &str) -> Item {
        Item::new(1, name)
            .with_categories(["Drama", "Action"])
            .with_kind("TV")
            .with_episodes(24)
            .with_rating(8.0)
            .with_popularity(500_000)
    }

    #[test]
    fn test_categories_sorted_and_deduplicated() {
        let item = Item::new(1, "Monster").with_categories([
            " Mystery",
            "Drama",
            "Seinen ",
            "Drama",
            "",
        ]);
        assert_eq!(item.categories(), ["Drama", "Mystery", "Seinen"]);
    }

    #[test]
    fn test_identity_is_name() {
        let a = sample("Steins;Gate");
        let b = Item::new(9253, "Steins;Gate").with_kind("Movie");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_different_names_differ_even_with_same_id() {
        let a = Item::new(7, "Clannad");
        let b = Item::new(7, "Clannad: After Story");
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_has_category() {
        let item = sample("Cowboy Bebop");
        assert!(item.has_category("Action"));
        assert!(!item.has_category("Comedy"));
    }

    #[test]
    fn test_shared_categories() {
        let a = Item::new(1, "A").with_categories(["Action", "Drama", "Sci-Fi"]);
        let b = Item::new(2, "B").with_categories(["Sci-Fi", "Action", "Comedy"]);
        assert_eq!(a.shared_categories(&b), 2);
        assert_eq!(b.shared_categories(&a), 2);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let json = serde_json::to_value(sample("Mushishi")).unwrap();
        assert_eq!(json["type"], "TV");
        assert_eq!(json["categories"][0], "Action");
    }
}
