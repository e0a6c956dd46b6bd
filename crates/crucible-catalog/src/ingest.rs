//! CSV ingestion: the only I/O-bound step in the system.
//!
//! Reads a headered CSV into [`RawRow`]s and builds a [`CatalogStore`].
//! Expected columns match the [`Record`](crate::Record) field names:
//! `id`, `description`, `applicable_years`, `configuration`, `material`,
//! `comments`. Every column except `id` is optional; a missing column or
//! blank cell becomes the empty string.
//!
//! Structural defects (unreadable source, missing or duplicate ids) fail
//! the whole load. Callers doing a catalog refresh keep the prior store in
//! service when this returns an error.

use std::io;
use std::path::Path;

use crucible_core::observability::catalog_span;

use crate::error::{LoadError, LoadResult};
use crate::record::RawRow;
use crate::store::CatalogStore;

/// Loads a catalog store from a CSV file.
///
/// # Errors
///
/// Returns [`LoadError::Source`] if the file cannot be opened or a row
/// cannot be parsed, and the structural [`LoadError`] variants for
/// missing/duplicate ids.
pub fn load_csv_path(path: impl AsRef<Path>) -> LoadResult<CatalogStore> {
    let path = path.as_ref();
    let span = catalog_span("load_csv", &path.display().to_string());
    let _guard = span.enter();

    let reader = csv::Reader::from_path(path)
        .map_err(|e| LoadError::source(format!("failed to open {}: {e}", path.display())))?;
    let store = load_csv(reader)?;
    tracing::info!(path = %path.display(), records = store.len(), "Catalog loaded from CSV");
    Ok(store)
}

/// Loads a catalog store from any CSV reader.
///
/// # Errors
///
/// Same contract as [`load_csv_path`].
pub fn load_csv_reader<R: io::Read>(reader: R) -> LoadResult<CatalogStore> {
    load_csv(csv::Reader::from_reader(reader))
}

fn load_csv<R: io::Read>(mut reader: csv::Reader<R>) -> LoadResult<CatalogStore> {
    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = result
            .map_err(|e| LoadError::source(format!("failed to read row {}: {e}", i + 1)))?;
        rows.push(row);
    }
    CatalogStore::load(rows)
}
