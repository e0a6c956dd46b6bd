//! Casting API routes.
//!
//! Read-only operations over the catalog query engine.
//!
//! ## Routes
//!
//! - `GET /castings` - Paginated catalog browse
//! - `GET /castings/{id}` - Lookup by casting id
//! - `GET /castings/{id}/export` - Canonical JSON download
//! - `GET /search?q=` - Multi-field substring search

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crucible_catalog::{Record, export};

use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;

/// One casting on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct CastingResponse {
    /// Casting identifier.
    pub id: String,
    /// Free-text description.
    pub description: String,
    /// Applicable years as free text.
    pub applicable_years: String,
    /// Trim/variant label.
    pub configuration: String,
    /// Material.
    pub material: String,
    /// Additional comments.
    pub comments: String,
}

impl From<&Record> for CastingResponse {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            description: record.description.clone(),
            applicable_years: record.applicable_years.clone(),
            configuration: record.configuration.clone(),
            material: record.material.clone(),
            comments: record.comments.clone(),
        }
    }
}

/// Pagination query parameters for the browse endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCastingsQuery {
    /// 1-based page number (default 1).
    pub page: Option<usize>,
    /// Page size; clamped to the configured maximum.
    pub limit: Option<usize>,
}

/// Paginated catalog browse response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListCastingsResponse {
    /// Castings on this page, in stable catalog order.
    pub castings: Vec<CastingResponse>,
    /// Total castings in the catalog.
    pub total: usize,
    /// The 1-based page number that was served.
    pub page: usize,
    /// The effective (possibly clamped) page size.
    pub limit: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether castings exist beyond this page.
    pub has_more: bool,
}

/// Search query parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query; matched case-insensitively as a substring.
    pub q: Option<String>,
}

/// Search response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Matching castings, in stable catalog order.
    pub results: Vec<CastingResponse>,
    /// The query that was searched.
    pub query: String,
    /// Number of matches.
    pub count: usize,
}

/// Creates casting routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/castings", get(list_castings))
        .route("/castings/:id", get(get_casting))
        .route("/castings/:id/export", get(export_casting))
        .route("/search", get(search_castings))
}

/// Browse the catalog page by page.
///
/// GET /api/v1/castings
#[utoipa::path(
    get,
    path = "/api/v1/castings",
    tag = "castings",
    params(ListCastingsQuery),
    responses(
        (status = 200, description = "One page of castings", body = ListCastingsResponse),
        (status = 400, description = "Bad request", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_castings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCastingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page_number = params.page.unwrap_or(1);
    tracing::debug!(page = page_number, limit = ?params.limit, "Browsing castings");

    let engine = state.engine();
    let page = engine.page(page_number, params.limit)?;

    let castings = page.records.iter().map(CastingResponse::from).collect();
    let total_pages = page.total_count.div_ceil(page.limit);

    Ok(Json(ListCastingsResponse {
        castings,
        total: page.total_count,
        page: page.page,
        limit: page.limit,
        total_pages,
        has_more: page.has_more,
    }))
}

/// Look up a casting by id.
///
/// GET /api/v1/castings/{id}
#[utoipa::path(
    get,
    path = "/api/v1/castings/{id}",
    tag = "castings",
    params(
        ("id" = String, Path, description = "Casting identifier (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Casting found", body = CastingResponse),
        (status = 404, description = "Not found", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_casting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(casting = %id, "Looking up casting");

    let engine = state.engine();
    let record = engine.lookup(&id)?;

    Ok(Json(CastingResponse::from(record)))
}

/// Search castings across the searchable fields.
///
/// GET /api/v1/search
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "castings",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
    )
)]
pub(crate) async fn search_castings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.q.unwrap_or_default();
    tracing::debug!(query = %query, "Searching castings");

    let engine = state.engine();
    let matches = engine.search(&query);

    let results: Vec<CastingResponse> = matches.into_iter().map(CastingResponse::from).collect();
    let count = results.len();

    Ok(Json(SearchResponse {
        results,
        query,
        count,
    }))
}

/// Download a casting as canonical JSON.
///
/// GET /api/v1/castings/{id}/export
#[utoipa::path(
    get,
    path = "/api/v1/castings/{id}/export",
    tag = "castings",
    params(
        ("id" = String, Path, description = "Casting identifier (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Canonical JSON attachment", body = CastingResponse),
        (status = 404, description = "Not found", body = ApiErrorBody),
        (status = 500, description = "Export failed", body = ApiErrorBody),
    )
)]
pub(crate) async fn export_casting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(casting = %id, "Exporting casting");

    let engine = state.engine();
    let record = engine.lookup(&id)?;
    let bytes = export::serialize(record)?;

    let disposition = format!("attachment; filename=\"{}\"", export::export_file_name(&id));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
