//! Error types for catalog ingestion.

use thiserror::Error;

/// Result type alias for load operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Structural defects in ingestion input.
///
/// Any of these rejects the load entirely: masking an upstream data error by
/// skipping or overwriting rows would be worse than serving the previous
/// catalog generation.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A row had no id (or an empty one).
    #[error("row {row} is missing an id")]
    MissingId {
        /// 1-based data row number (excluding the header).
        row: usize,
    },

    /// Two rows shared an id.
    #[error("duplicate id {id:?} at row {row}")]
    DuplicateId {
        /// The id that appeared more than once.
        id: String,
        /// 1-based data row number of the second occurrence.
        row: usize,
    },

    /// The source could not be read or parsed.
    #[error("source error: {message}")]
    Source {
        /// Description of the source failure.
        message: String,
    },
}

impl LoadError {
    /// Creates a new source error.
    #[must_use]
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}
