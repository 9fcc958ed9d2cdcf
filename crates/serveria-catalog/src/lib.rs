//! Static chassis and component catalog.
//!
//! Catalog data is externalized as JSON; the crate ships the two known
//! lineups and can load any other file with the same shape.

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, CatalogSummary};
pub use types::*;
