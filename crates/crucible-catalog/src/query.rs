//! The query engine: lookup, pagination, and search over one catalog
//! generation.
//!
//! A [`QueryEngine`] holds an `Arc` snapshot of the store, so every
//! operation on one engine instance sees a single, internally consistent
//! generation. All operations are pure and in-memory; nothing here blocks,
//! retries, or performs I/O.

use std::sync::Arc;

use crucible_core::{Error, Result};

use crate::record::Record;
use crate::store::CatalogStore;

/// Default page size when the caller does not specify a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Hard cap on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Pagination limits, injected by the service layer.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    /// Page size when the caller does not specify one.
    pub default: usize,
    /// Hard cap on the page size.
    pub max: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_PAGE_LIMIT,
            max: MAX_PAGE_LIMIT,
        }
    }
}

/// One page of catalog records.
#[derive(Debug, Clone)]
pub struct Page {
    /// Records on this page, in store order.
    pub records: Vec<Record>,
    /// Total records in the catalog, computed fresh per call.
    pub total_count: usize,
    /// The 1-based page number that was served.
    pub page: usize,
    /// The effective (possibly clamped) page size.
    pub limit: usize,
    /// Whether records exist beyond this page.
    pub has_more: bool,
}

/// Stateless query logic over one catalog generation.
///
/// Construct one per request from
/// [`SharedCatalog::current`](crate::SharedCatalog::current); the engine
/// holds only a read reference and owns no records.
#[derive(Debug)]
pub struct QueryEngine {
    store: Arc<CatalogStore>,
    limits: PageLimits,
}

impl QueryEngine {
    /// Creates an engine over a store snapshot with default page limits.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self::with_limits(store, PageLimits::default())
    }

    /// Creates an engine with explicit page limits.
    #[must_use]
    pub fn with_limits(store: Arc<CatalogStore>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    /// Looks up a casting by exact, case-sensitive id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] for an unknown id. This is a
    /// normal, expected outcome, distinct from any internal fault.
    pub fn lookup(&self, id: &str) -> Result<&Record> {
        self.store
            .get(id)
            .ok_or_else(|| Error::resource_not_found("casting", id))
    }

    /// Returns one page of the catalog in stable store order.
    ///
    /// `limit` falls back to the configured default when `None` and is
    /// silently clamped to the configured maximum. Pages beyond the last
    /// return an empty page with `has_more = false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `page` is 0 or the requested
    /// limit is 0.
    pub fn page(&self, page: usize, limit: Option<usize>) -> Result<Page> {
        if page < 1 {
            return Err(Error::invalid_parameter("page must be >= 1"));
        }
        let requested = limit.unwrap_or(self.limits.default);
        if requested < 1 {
            return Err(Error::invalid_parameter("limit must be >= 1"));
        }
        let limit = requested.min(self.limits.max);

        let all = self.store.all();
        let total_count = all.len();
        let offset = (page - 1).saturating_mul(limit);
        let end = offset.saturating_add(limit).min(total_count);
        let records: Vec<Record> = if offset < total_count {
            all[offset..end].to_vec()
        } else {
            Vec::new()
        };
        let has_more = offset.saturating_add(records.len()) < total_count;

        Ok(Page {
            records,
            total_count,
            page,
            limit,
            has_more,
        })
    }

    /// Searches the catalog with a case-insensitive substring match.
    ///
    /// A record matches when the query occurs in any searchable field:
    /// `id`, `description`, `applicable_years`, `configuration`, or
    /// `comments`. The `material` field is deliberately not searched.
    /// Matches keep store order; no relevance ranking is applied.
    ///
    /// An empty or whitespace-only query returns no matches rather than
    /// the full catalog. Surrounding whitespace in a non-blank query is
    /// part of the needle: `" range"` requires the space to occur too.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Record> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        self.store
            .all()
            .iter()
            .filter(|record| record_matches(record, &needle))
            .collect()
    }
}

/// The searchable field set, OR-combined. `needle` must be lowercase.
fn record_matches(record: &Record, needle: &str) -> bool {
    [
        &record.id,
        &record.description,
        &record.applicable_years,
        &record.configuration,
        &record.comments,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
