//! Ingestion error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading a catalog.
///
/// Rows that are merely incomplete are skipped and reported through
/// [`LoadReport`](crate::LoadReport) instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The dataset could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed on malformed input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A row has fewer columns than the format requires.
    #[error("line {line}: missing column {column}")]
    MissingColumn { line: u64, column: &'static str },

    /// A numeric field that must parse did not.
    #[error("line {line}: malformed {field} {value:?}")]
    MalformedField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl IngestError {
    /// Line number of the offending row, when the error is tied to one.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::MissingColumn { line, .. } | Self::MalformedField { line, .. } => Some(*line),
            Self::Csv(e) => e.position().map(csv::Position::line),
            Self::Io { .. } => None,
        }
    }
}

/// Convenience alias for ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
