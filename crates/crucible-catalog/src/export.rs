//! Export serialization for casting records.
//!
//! Exports are canonical JSON: stable key order, no whitespace, UTF-8, no
//! trailing artifacts. Serializing the same record always yields
//! byte-identical output, which makes downloads reproducible and lets tests
//! compare raw bytes.

use crucible_core::canonical_json;
use crucible_core::{Error, Result};

use crate::record::Record;

/// Serializes a record into its canonical export bytes.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the record cannot be represented in
/// the output encoding. The all-string field model makes this unreachable
/// in practice, but the contract is explicit.
pub fn serialize(record: &Record) -> Result<Vec<u8>> {
    canonical_json::to_canonical_bytes(record)
        .map_err(|e| Error::serialization(format!("failed to export record {}: {e}", record.id)))
}

/// Parses canonical export bytes back into a record.
///
/// # Errors
///
/// Returns [`Error::Serialization`] if the bytes are not a valid record.
pub fn deserialize(bytes: &[u8]) -> Result<Record> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::serialization(format!("failed to parse export: {e}")))
}

/// Derives the deterministic download file name for a record id.
#[must_use]
pub fn export_file_name(id: &str) -> String {
    format!("casting_{id}.json")
}
