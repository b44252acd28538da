//! Pairwise similarity between catalog items.
//!
//! The score is a weighted sum of five sub-scores, each in `[0, 1]`:
//!
//! | feature              | sub-score                                   | default weight |
//! |----------------------|---------------------------------------------|----------------|
//! | category overlap     | `|A ∩ B| / max(|A|, |B|)`                   | 0.40           |
//! | type match           | `1` if the type labels are equal, else `0`  | 0.20           |
//! | episode closeness    | `1 - |a - b| / max(a, b)`                   | 0.15           |
//! | rating closeness     | `1 - |a - b| / 10`                          | 0.15           |
//! | popularity closeness | `1 - |a - b| / max(a, b)`                   | 0.10           |
//!
//! Two equal counts (including two zeros) are fully close, and two items
//! without any category share all of them.

use kizuna_core::Item;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Scores within this distance of `1.0` are treated as a perfect match, so
/// rounding in the weighted sum cannot turn identical items into neighbors.
const PERFECT_MATCH_EPSILON: f64 = 1e-9;

/// Relative weight of each sub-score. The weights must be finite,
/// non-negative, and add up to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    pub categories: f64,
    pub kind: f64,
    pub episodes: f64,
    pub rating: f64,
    pub popularity: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            categories: 0.40,
            kind: 0.20,
            episodes: 0.15,
            rating: 0.15,
            popularity: 0.10,
        }
    }
}

impl SimilarityWeights {
    fn as_array(&self) -> [f64; 5] {
        [
            self.categories,
            self.kind,
            self.episodes,
            self.rating,
            self.popularity,
        ]
    }

    pub fn validate(&self) -> GraphResult<()> {
        let weights = self.as_array();
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(GraphError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {bad}"
            )));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > PERFECT_MATCH_EPSILON {
            return Err(GraphError::InvalidWeights(format!(
                "weights must sum to 1, got {total}"
            )));
        }
        Ok(())
    }
}

/// The five sub-scores behind a similarity value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub categories: f64,
    pub kind: f64,
    pub episodes: f64,
    pub rating: f64,
    pub popularity: f64,
}

impl SimilarityBreakdown {
    pub fn between(a: &Item, b: &Item) -> Self {
        Self {
            categories: category_overlap(a, b),
            kind: if a.kind() == b.kind() { 1.0 } else { 0.0 },
            episodes: count_closeness(u64::from(a.episodes()), u64::from(b.episodes())),
            rating: rating_closeness(a.rating(), b.rating()),
            popularity: count_closeness(a.popularity(), b.popularity()),
        }
    }

    /// Combine the sub-scores into a single value in `[0, 1]`.
    pub fn score(&self, weights: &SimilarityWeights) -> f64 {
        let raw = weights.categories * self.categories
            + weights.kind * self.kind
            + weights.episodes * self.episodes
            + weights.rating * self.rating
            + weights.popularity * self.popularity;
        let score = raw.clamp(0.0, 1.0);
        if 1.0 - score <= PERFECT_MATCH_EPSILON {
            1.0
        } else {
            score
        }
    }
}

/// Similarity of two items in `[0, 1]`. Pure; symmetric in its arguments.
pub fn similarity(a: &Item, b: &Item, weights: &SimilarityWeights) -> f64 {
    SimilarityBreakdown::between(a, b).score(weights)
}

fn category_overlap(a: &Item, b: &Item) -> f64 {
    let largest = a.categories().len().max(b.categories().len());
    if largest == 0 {
        return 1.0;
    }
    a.shared_categories(b) as f64 / largest as f64
}

fn count_closeness(a: u64, b: u64) -> f64 {
    let largest = a.max(b);
    if largest == 0 {
        return 1.0;
    }
    1.0 - a.abs_diff(b) as f64 / largest as f64
}

fn rating_closeness(a: f32, b: f32) -> f64 {
    let diff = (f64::from(a) - f64::from(b)).abs();
    (1.0 - diff / 10.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, categories: &[&str], kind: &str, episodes: u32, rating: f32, members: u64) -> Item {
        Item::new(1, name)
            .with_categories(categories)
            .with_kind(kind)
            .with_episodes(episodes)
            .with_rating(rating)
            .with_popularity(members)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(SimilarityWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = SimilarityWeights {
            categories: 0.5,
            ..SimilarityWeights::default()
        };
        assert!(matches!(weights.validate(), Err(GraphError::InvalidWeights(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = SimilarityWeights {
            categories: 0.6,
            kind: -0.2,
            ..SimilarityWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_identical_items_score_one() {
        let a = item("Fullmetal Alchemist: Brotherhood", &["Action", "Adventure", "Drama"], "TV", 64, 9.26, 793_665);
        let b = a.clone();
        assert_eq!(similarity(&a, &b, &SimilarityWeights::default()), 1.0);
    }

    #[test]
    fn test_worked_example() {
        let a = item("A", &["Action", "Drama"], "TV", 24, 8.0, 500_000);
        let b = item("B", &["Action"], "TV", 24, 8.0, 500_000);

        let breakdown = SimilarityBreakdown::between(&a, &b);
        assert!(approx(breakdown.categories, 0.5));
        assert!(approx(breakdown.kind, 1.0));
        assert!(approx(breakdown.episodes, 1.0));
        assert!(approx(breakdown.rating, 1.0));
        assert!(approx(breakdown.popularity, 1.0));

        let score = similarity(&a, &b, &SimilarityWeights::default());
        assert!(approx(score, 0.80));
        assert!(approx(1.0 - score, 0.20));
    }

    #[test]
    fn test_symmetric() {
        let a = item("A", &["Comedy", "School"], "TV", 12, 7.5, 120_000);
        let b = item("B", &["Comedy", "Romance", "School"], "OVA", 2, 6.9, 30_000);
        let weights = SimilarityWeights::default();
        assert!(approx(similarity(&a, &b, &weights), similarity(&b, &a, &weights)));
    }

    #[test]
    fn test_zero_counts_are_fully_close() {
        assert!(approx(count_closeness(0, 0), 1.0));
        assert!(approx(count_closeness(0, 10), 0.0));
        assert!(approx(count_closeness(12, 24), 0.5));
    }

    #[test]
    fn test_rating_closeness_clamped() {
        assert!(approx(rating_closeness(9.0, 7.0), 0.8));
        assert!(approx(rating_closeness(25.0, 0.0), 0.0));
    }

    #[test]
    fn test_disjoint_items_score_low() {
        let a = item("A", &["Horror"], "Movie", 1, 2.0, 1_000);
        let b = item("B", &["Kids"], "TV", 300, 9.0, 1_000_000);
        let score = similarity(&a, &b, &SimilarityWeights::default());
        assert!(score < 0.2, "score was {score}");
    }

    #[test]
    fn test_empty_category_sets_overlap_fully() {
        let a = item("A", &[], "TV", 1, 5.0, 10);
        let b = item("B", &[], "TV", 1, 5.0, 10);
        assert!(approx(category_overlap(&a, &b), 1.0));
        let c = item("C", &["Drama"], "TV", 1, 5.0, 10);
        assert!(approx(category_overlap(&a, &c), 0.0));
    }
}
