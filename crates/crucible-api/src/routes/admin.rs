//! Catalog administration routes.
//!
//! ## Routes
//!
//! - `POST /catalog/reload` - Re-ingest the CSV source and swap the store

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crucible_catalog::ingest;

use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;

/// Reload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    /// Records in the freshly published catalog generation.
    pub records: usize,
}

/// Creates admin routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/catalog/reload", post(reload_catalog))
}

/// Re-ingest the configured CSV and atomically swap the catalog.
///
/// The load runs to completion before anything is published; on any
/// structural defect the prior generation stays in service untouched.
///
/// POST /api/v1/catalog/reload
#[utoipa::path(
    post,
    path = "/api/v1/catalog/reload",
    tag = "admin",
    responses(
        (status = 200, description = "Catalog reloaded", body = ReloadResponse),
        (status = 400, description = "No catalog source configured", body = ApiErrorBody),
        (status = 422, description = "Load rejected", body = ApiErrorBody),
    )
)]
pub(crate) async fn reload_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(path) = state.config.catalog_csv.clone() else {
        return Err(ApiError::bad_request("no catalog CSV source configured"));
    };

    tracing::info!(path = %path.display(), "Reloading catalog");

    // The CSV read is synchronous; keep it off the async workers.
    let load = tokio::task::spawn_blocking({
        let path = path.clone();
        move || ingest::load_csv_path(&path)
    });

    let store = load
        .await
        .map_err(|e| ApiError::internal(format!("catalog reload task failed: {e}")))?
        .map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Catalog reload rejected");
            ApiError::from(e)
        })?;

    let records = store.len();
    state.catalog.replace(store);

    Ok(Json(ReloadResponse { records }))
}
