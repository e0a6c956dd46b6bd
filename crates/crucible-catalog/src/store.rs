//! The immutable catalog store and its swappable handle.
//!
//! A [`CatalogStore`] is one load generation: every record indexed by id
//! for O(1) lookup, plus the records in stable load order so page
//! boundaries and search ordering are reproducible for the lifetime of the
//! generation. The store exposes no mutation; refresh is a whole-store
//! replace through [`SharedCatalog`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{LoadError, LoadResult};
use crate::record::{RawRow, Record};

/// The immutable in-memory index of all casting records for one load
/// generation.
#[derive(Debug, Default)]
pub struct CatalogStore {
    /// Records in load order. Pagination and search scan this.
    records: Vec<Record>,
    /// Index from id to position in `records`.
    by_id: HashMap<String, usize>,
}

impl CatalogStore {
    /// Returns an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from raw ingestion rows.
    ///
    /// Row order becomes the store's stable order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingId`] if a row has an empty id, or
    /// [`LoadError::DuplicateId`] if two rows share an id. Either defect
    /// rejects the entire load.
    pub fn load(rows: impl IntoIterator<Item = RawRow>) -> LoadResult<Self> {
        let mut records = Vec::new();
        let mut by_id = HashMap::new();

        for (i, row) in rows.into_iter().enumerate() {
            let row_number = i + 1;
            if row.id.is_empty() {
                return Err(LoadError::MissingId { row: row_number });
            }

            let record = Record::from(row);
            if by_id.contains_key(&record.id) {
                return Err(LoadError::DuplicateId {
                    id: record.id,
                    row: row_number,
                });
            }

            by_id.insert(record.id.clone(), records.len());
            records.push(record);
        }

        tracing::debug!(records = records.len(), "Catalog store built");
        Ok(Self { records, by_id })
    }

    /// Returns the record with the given id, if present.
    ///
    /// Exact, case-sensitive match.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Returns all records in stable load order.
    #[must_use]
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Atomically swappable handle to the current catalog generation.
///
/// The single mutation point in the system: readers take a snapshot with
/// [`current`](Self::current) and complete against it even if a
/// [`replace`](Self::replace) happens mid-request. Readers never observe a
/// half-old, half-new catalog.
#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<CatalogStore>>,
}

impl SharedCatalog {
    /// Creates a handle over an initial store generation.
    #[must_use]
    pub fn new(store: CatalogStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Returns the current generation.
    #[must_use]
    pub fn current(&self) -> Arc<CatalogStore> {
        // A poisoned lock only means a writer panicked mid-swap; the Arc
        // it guards is still a complete generation.
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publishes a freshly loaded store as the new generation.
    ///
    /// Callers load (and possibly fail) outside this method, so a failed
    /// load never displaces the generation in service.
    pub fn replace(&self, store: CatalogStore) {
        let store = Arc::new(store);
        match self.current.write() {
            Ok(mut guard) => *guard = store,
            Err(poisoned) => *poisoned.into_inner() = store,
        }
        tracing::info!("Catalog generation replaced");
    }
}

impl Default for SharedCatalog {
    fn default() -> Self {
        Self::new(CatalogStore::empty())
    }
}
