//! Error types and result aliases for Crucible.
//!
//! This module defines the shared error types used across all Crucible
//! components. Errors are structured for programmatic handling: the query
//! engine classifies outcomes, it never retries, and the API layer decides
//! how each class maps onto the wire.

use std::fmt;

/// The result type used throughout Crucible.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Crucible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// An expected, user-facing outcome (an unknown casting id is normal
    /// traffic, not a fault).
    #[error("not found: {resource_type} with id {id}")]
    ResourceNotFound {
        /// The type of resource that was looked up.
        resource_type: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// An invalid parameter was supplied by the caller.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what made the parameter invalid.
        message: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// An internal error occurred that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new resource not found error.
    #[must_use]
    pub fn resource_not_found(resource_type: &'static str, id: impl fmt::Display) -> Self {
        Self::ResourceNotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a new invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates a new serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_not_found_display_includes_type_and_id() {
        let err = Error::resource_not_found("casting", "682B20C75BBD");
        assert_eq!(err.to_string(), "not found: casting with id 682B20C75BBD");
    }

    #[test]
    fn invalid_parameter_display() {
        let err = Error::invalid_parameter("page must be >= 1");
        assert_eq!(err.to_string(), "invalid parameter: page must be >= 1");
    }
}
