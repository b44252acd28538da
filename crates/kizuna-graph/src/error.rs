//! Graph error types.
//!
//! None of these are fatal: every failed operation leaves the graph exactly
//! as it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("vertex not found: {0}")]
    VertexNotFound(String),

    #[error("edge would be a loop on {0}")]
    SelfLoop(String),

    #[error("edge already exists between {a} and {b}")]
    DuplicateEdge { a: String, b: String },

    #[error("no edge between {a} and {b}")]
    EdgeNotFound { a: String, b: String },

    /// Edge weights are distances in `(0, 1]`.
    #[error("invalid edge weight {0}: expected a value in (0, 1]")]
    InvalidWeight(f64),

    #[error("invalid similarity threshold {0}: expected a value in [0, 1]")]
    InvalidThreshold(f64),

    #[error("invalid similarity weights: {0}")]
    InvalidWeights(String),
}

impl GraphError {
    /// Returns `true` when the error reports a missing vertex or edge.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VertexNotFound(_) | Self::EdgeNotFound { .. })
    }
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
