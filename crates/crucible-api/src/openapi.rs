//! `OpenAPI` (3.1) specification generation for `crucible-api`.
//!
//! The generated spec documents the read-only catalog surface and the
//! reload trigger; it can be checked in to detect breaking API changes.

use utoipa::OpenApi;

/// `OpenAPI` documentation for the Crucible REST API (`/api/v1/*`).
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crucible API",
        description = "Casting catalog REST API: lookup, browse, search, export"
    ),
    paths(
        crate::routes::castings::list_castings,
        crate::routes::castings::get_casting,
        crate::routes::castings::search_castings,
        crate::routes::castings::export_casting,
        crate::routes::admin::reload_catalog,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::routes::castings::CastingResponse,
            crate::routes::castings::ListCastingsResponse,
            crate::routes::castings::SearchResponse,
            crate::routes::admin::ReloadResponse,
        )
    ),
    tags(
        (name = "castings", description = "Catalog read operations"),
        (name = "admin", description = "Catalog administration"),
    )
)]
pub struct ApiDoc;

/// Returns the generated `OpenAPI` spec.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Returns the generated `OpenAPI` spec serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen).
pub fn openapi_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&openapi())
}
