//! Canonical JSON serialization for deterministic exports.
//!
//! Exported casting records must be byte-identical across repeated
//! serializations of the same record, so downloads are reproducible and
//! round-trip tests can compare raw bytes.
//!
//! Canonical JSON has:
//! - Object keys sorted lexicographically (UTF-8 byte order)
//! - No whitespace
//! - UTF-8 output, no trailing newline
//! - Integers only (floats rejected)
//!
//! Floats are rejected because their stringification is not stable across
//! implementations. The catalog record model is all strings, so this cannot
//! fire on the export path, but the contract is explicit.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Errors that can occur during canonical JSON serialization.
#[derive(Debug, thiserror::Error)]
pub enum CanonicalJsonError {
    /// Serde JSON conversion failed.
    #[error("serde_json error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Float values are not allowed in canonical JSON.
    #[error("float values are not allowed in canonical JSON (use integers)")]
    FloatNotAllowed,

    /// IO error during writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 encoding error (should never happen with valid JSON).
    #[error("UTF-8 encoding error")]
    Utf8Error,
}

/// Serialize `value` into canonical JSON bytes.
///
/// # Errors
///
/// Returns `CanonicalJsonError::Serde` if serialization fails, or
/// `CanonicalJsonError::FloatNotAllowed` if the value contains floats.
#[must_use = "canonical bytes should be used for export or comparison"]
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalJsonError> {
    let v = serde_json::to_value(value)?;
    let mut out = Vec::<u8>::new();
    write_value(&v, &mut out)?;
    Ok(out)
}

/// Same as `to_canonical_bytes`, but returns a UTF-8 String.
///
/// # Errors
///
/// Returns `CanonicalJsonError::Serde` if serialization fails,
/// `CanonicalJsonError::FloatNotAllowed` if the value contains floats, or
/// `CanonicalJsonError::Utf8Error` if UTF-8 conversion fails.
#[must_use = "canonical string should be used for export or comparison"]
pub fn to_canonical_string<T: Serialize>(value: &T) -> Result<String, CanonicalJsonError> {
    let bytes = to_canonical_bytes(value)?;
    String::from_utf8(bytes).map_err(|_| CanonicalJsonError::Utf8Error)
}

fn write_value(v: &Value, out: &mut Vec<u8>) -> Result<(), CanonicalJsonError> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => write_number(n, out)?,
        Value::String(s) => {
            // serde_json writes the string with quotes + escaping, no whitespace.
            serde_json::to_writer(&mut *out, s)?;
        }
        Value::Array(arr) => {
            out.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(map, out)?,
    }
    Ok(())
}

fn write_object(map: &Map<String, Value>, out: &mut Vec<u8>) -> Result<(), CanonicalJsonError> {
    out.push(b'{');

    // Sort keys deterministically by UTF-8 byte order.
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    for (i, k) in keys.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }

        serde_json::to_writer(&mut *out, *k)?;
        out.push(b':');

        // Key came from map.keys(), so it is present.
        if let Some(val) = map.get(*k) {
            write_value(val, out)?;
        }
    }

    out.push(b'}');
    Ok(())
}

fn write_number(n: &Number, out: &mut Vec<u8>) -> Result<(), CanonicalJsonError> {
    use std::io::Write;

    if let Some(i) = n.as_i64() {
        write!(out, "{i}")?;
        return Ok(());
    }
    if let Some(u) = n.as_u64() {
        write!(out, "{u}")?;
        return Ok(());
    }

    // serde_json::Number only falls through to here for float payloads.
    Err(CanonicalJsonError::FloatNotAllowed)
}
