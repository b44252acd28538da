//! Similarity graph for kizuna.
//!
//! Scores every pair of catalog items, connects the ones that are similar
//! enough, and answers adjacency, traversal and path queries over the
//! result.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod analysis;
pub mod error;
pub mod graph;
pub mod similarity;

pub use error::{GraphError, GraphResult};
pub use graph::{EdgeRef, SimilarityGraph, Traversal};
pub use similarity::{similarity, SimilarityBreakdown, SimilarityWeights};
