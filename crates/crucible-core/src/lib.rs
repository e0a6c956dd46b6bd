//! # crucible-core
//!
//! Core primitives shared across the Crucible casting catalog service:
//!
//! - **Error Types**: Shared error definitions and result types
//! - **Canonical Serialization**: Deterministic JSON encoding for exports
//! - **Observability**: Structured logging initialization and span helpers
//!
//! ## Crate Boundary
//!
//! `crucible-core` is the only crate allowed to define shared primitives.
//! The catalog domain lives in `crucible-catalog`; HTTP composition lives
//! in `crucible-api`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod canonical_json;
pub mod error;
pub mod observability;

pub use canonical_json::{to_canonical_bytes, to_canonical_string};
pub use error::{Error, Result};
pub use observability::{LogFormat, init_logging};
