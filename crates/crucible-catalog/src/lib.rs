//! # crucible-catalog
//!
//! Catalog domain for the Crucible casting lookup service.
//!
//! This crate implements the catalog: an immutable, in-memory store of
//! casting records built once from a CSV source, plus the query engine
//! that serves reads over it.
//!
//! - **Record Model**: One immutable value per casting
//! - **Catalog Store**: `id → Record` index plus stable load order
//! - **Ingestion**: CSV rows validated into a store, failing fast on
//!   structural defects
//! - **Query Engine**: lookup, pagination, and multi-field substring search
//! - **Export**: canonical, byte-deterministic record serialization
//!
//! ## Consistency model
//!
//! A loaded [`CatalogStore`] is immutable for its lifetime; the only
//! mutation in the system is whole-store replacement through
//! [`SharedCatalog`], which swaps an `Arc` so in-flight readers always
//! complete against a single generation. A failed load never reaches the
//! swap, so the last good catalog stays in service.
//!
//! ## Example
//!
//! ```rust
//! use crucible_catalog::{CatalogStore, QueryEngine, RawRow};
//! use std::sync::Arc;
//!
//! let store = CatalogStore::load(vec![RawRow {
//!     id: "682B20C75BBD".to_string(),
//!     description: "Rear underbody casting".to_string(),
//!     ..RawRow::default()
//! }])?;
//!
//! let engine = QueryEngine::new(Arc::new(store));
//! let record = engine.lookup("682B20C75BBD")?;
//! assert_eq!(record.description, "Rear underbody casting");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod export;
pub mod ingest;
pub mod query;
pub mod record;
pub mod store;

// Re-export main types at crate root
pub use error::LoadError;
pub use export::{deserialize, export_file_name, serialize};
pub use query::{Page, PageLimits, QueryEngine};
pub use record::{RawRow, Record};
pub use store::{CatalogStore, SharedCatalog};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::LoadError;
    pub use crate::query::{Page, PageLimits, QueryEngine};
    pub use crate::record::{RawRow, Record};
    pub use crate::store::{CatalogStore, SharedCatalog};
}
