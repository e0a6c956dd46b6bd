//! # crucible-api
//!
//! HTTP composition layer for the Crucible casting catalog.
//!
//! This crate provides the API surface, handling:
//!
//! - **Routing**: HTTP endpoint configuration
//! - **Service Wiring**: Composition of the catalog query engine
//! - **Observability**: Structured request tracing and health checks
//!
//! ## Design Principles
//!
//! This crate is a **thin composition layer** with no domain policy.
//! All catalog logic lives in `crucible-catalog`; this crate only
//! translates HTTP requests into engine calls and engine outcomes into
//! wire responses.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /health                        - Health check
//! GET  /ready                         - Readiness check
//! GET  /api/v1/castings               - Paginated catalog browse
//! GET  /api/v1/castings/{id}          - Lookup by casting id
//! GET  /api/v1/castings/{id}/export   - Canonical JSON download
//! GET  /api/v1/search?q=              - Multi-field substring search
//! POST /api/v1/catalog/reload         - Re-ingest the CSV and swap the store
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use crucible_api::config::Config;
//! use crucible_api::server::Server;
//!
//! let server = Server::builder().config(Config::from_env()?).build();
//! server.serve().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
