//! Observability infrastructure for Crucible.
//!
//! Structured logging with consistent spans. This module provides the
//! initialization helper and span constructors used across all Crucible
//! components.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `crucible_catalog=debug`)
///
/// # Example
///
/// ```rust
/// use crucible_core::observability::{LogFormat, init_logging};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for catalog operations with standard fields.
///
/// # Example
///
/// ```rust
/// use crucible_core::observability::catalog_span;
///
/// let span = catalog_span("lookup", "682B20C75BBD");
/// let _guard = span.enter();
/// // ... do catalog operation
/// ```
#[must_use]
pub fn catalog_span(operation: &str, subject: &str) -> Span {
    tracing::info_span!(
        "catalog",
        op = operation,
        subject = subject,
    )
}
