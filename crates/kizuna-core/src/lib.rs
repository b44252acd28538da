//! Core catalog model for kizuna.
//!
//! This crate defines the catalog record ([`Item`]), its identifiers, and the
//! append-only [`Catalog`] that every index keys into.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use model::{Item, ItemId, ItemIndex};
