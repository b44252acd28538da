//! Catalog ingestion and configuration for kizuna.
//!
//! Reads the CSV dataset into a [`Catalog`](kizuna_core::Catalog), applying
//! the row filters described in [`loader`], and wires the catalog up with the
//! search indices and the similarity graph.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;

pub use config::Config;
pub use error::{IngestError, IngestResult};
pub use loader::{
    load_catalog, load_catalog_from_reader, LoadOptions, LoadReport, SkipReason, SkippedRow,
};
pub use pipeline::Dataset;
