//! API integration tests.
//!
//! Tests the complete request flow: HTTP → routes → query engine → catalog.

use std::io::Write;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use crucible_api::config::Config;
use crucible_api::server::Server;
use crucible_catalog::{CatalogStore, RawRow, ingest};

const CSV: &str = "\
id,description,applicable_years,configuration,material,comments
A1,Front rocker casting,2021-2022,Standard,AlSi10MnMg,
A2,Rear rocker casting,2021-2022,Standard,AlSi10MnMg,superseded by B1
B1,Rear underbody casting,2023-,Long Range,AlSi10MnMg,
";

fn sample_store() -> CatalogStore {
    ingest::load_csv_reader(CSV.as_bytes()).expect("sample CSV should load")
}

fn test_router() -> axum::Router {
    Server::builder()
        .debug(true)
        .catalog_store(sample_store())
        .build()
        .test_router()
}

fn scenario_store() -> CatalogStore {
    let rows = ["A1", "A2", "B1"].map(|id| RawRow {
        id: id.to_string(),
        ..RawRow::default()
    });
    CatalogStore::load(rows).expect("scenario rows should load")
}

mod helpers {
    use super::*;
    use serde::de::DeserializeOwned;

    pub fn make_request(method: Method, uri: &str) -> Result<Request<Body>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .context("build request")
    }

    pub async fn send(
        router: axum::Router,
        request: Request<Body>,
    ) -> Result<axum::response::Response> {
        let response = router.oneshot(request).await.map_err(|err| -> anyhow::Error { match err {} })?;
        Ok(response)
    }

    pub async fn response_body(
        response: axum::response::Response,
    ) -> Result<(StatusCode, axum::body::Bytes)> {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .context("read response body")?;
        Ok((status, body))
    }

    pub async fn get_json<T: DeserializeOwned>(
        router: axum::Router,
        uri: &str,
    ) -> Result<(StatusCode, T)> {
        let request = make_request(Method::GET, uri)?;
        let response = send(router, request).await?;
        let (status, body) = response_body(response).await?;
        let json = serde_json::from_slice(&body).with_context(|| {
            format!(
                "parse JSON response (status={status}): {}",
                String::from_utf8_lossy(&body)
            )
        })?;
        Ok((status, json))
    }

    pub async fn post_json<T: DeserializeOwned>(
        router: axum::Router,
        uri: &str,
    ) -> Result<(StatusCode, T)> {
        let request = make_request(Method::POST, uri)?;
        let response = send(router, request).await?;
        let (status, body) = response_body(response).await?;
        let json = serde_json::from_slice(&body).with_context(|| {
            format!(
                "parse JSON response (status={status}): {}",
                String::from_utf8_lossy(&body)
            )
        })?;
        Ok((status, json))
    }
}

// ============================================================================
// Health and Readiness
// ============================================================================

mod health {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct HealthResponse {
        status: String,
    }

    #[derive(Debug, Deserialize)]
    struct ReadyResponse {
        ready: bool,
        records: usize,
    }

    #[tokio::test]
    async fn health_is_ok() -> Result<()> {
        let (status, body): (_, HealthResponse) = helpers::get_json(test_router(), "/health").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        Ok(())
    }

    #[tokio::test]
    async fn ready_reports_record_count() -> Result<()> {
        let (status, body): (_, ReadyResponse) = helpers::get_json(test_router(), "/ready").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ready);
        assert_eq!(body.records, 3);
        Ok(())
    }

    #[tokio::test]
    async fn empty_catalog_is_not_ready() -> Result<()> {
        let router = Server::builder().debug(true).build().test_router();
        let (status, body): (_, ReadyResponse) = helpers::get_json(router, "/ready").await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.ready);
        Ok(())
    }
}

// ============================================================================
// Lookup
// ============================================================================

mod lookup {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CastingResponse {
        id: String,
        description: String,
        material: String,
        comments: String,
    }

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        code: String,
    }

    #[tokio::test]
    async fn known_id_returns_the_record() -> Result<()> {
        let (status, body): (_, CastingResponse) =
            helpers::get_json(test_router(), "/api/v1/castings/B1").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.id, "B1");
        assert_eq!(body.description, "Rear underbody casting");
        assert_eq!(body.material, "AlSi10MnMg");
        assert_eq!(body.comments, "");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_id_is_404_with_stable_code() -> Result<()> {
        let (status, body): (_, ErrorBody) =
            helpers::get_json(test_router(), "/api/v1/castings/NOPE").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        Ok(())
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() -> Result<()> {
        let (status, _): (_, ErrorBody) =
            helpers::get_json(test_router(), "/api/v1/castings/b1").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}

// ============================================================================
// Browse (pagination)
// ============================================================================

mod browse {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CastingResponse {
        id: String,
    }

    #[derive(Debug, Deserialize)]
    struct ListCastingsResponse {
        castings: Vec<CastingResponse>,
        total: usize,
        page: usize,
        limit: usize,
        total_pages: usize,
        has_more: bool,
    }

    fn scenario_router() -> axum::Router {
        Server::builder()
            .debug(true)
            .catalog_store(scenario_store())
            .build()
            .test_router()
    }

    #[tokio::test]
    async fn pages_slice_the_stable_order() -> Result<()> {
        let (status, body): (_, ListCastingsResponse) =
            helpers::get_json(scenario_router(), "/api/v1/castings?page=1&limit=2").await?;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body.castings.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["A1", "A2"]);
        assert_eq!(body.total, 3);
        assert_eq!(body.total_pages, 2);
        assert!(body.has_more);

        let (_, body): (_, ListCastingsResponse) =
            helpers::get_json(scenario_router(), "/api/v1/castings?page=2&limit=2").await?;
        let ids: Vec<&str> = body.castings.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["B1"]);
        assert!(!body.has_more);
        Ok(())
    }

    #[tokio::test]
    async fn defaults_apply_when_parameters_are_omitted() -> Result<()> {
        let (status, body): (_, ListCastingsResponse) =
            helpers::get_json(test_router(), "/api/v1/castings").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.page, 1);
        assert_eq!(body.limit, 50);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_limit_is_clamped_not_rejected() -> Result<()> {
        let (status, body): (_, ListCastingsResponse) =
            helpers::get_json(test_router(), "/api/v1/castings?page=1&limit=1000").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.limit, 100);
        Ok(())
    }

    #[tokio::test]
    async fn page_zero_is_a_bad_request() -> Result<()> {
        let request = helpers::make_request(Method::GET, "/api/v1/castings?page=0")?;
        let response = helpers::send(test_router(), request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_page_is_a_bad_request() -> Result<()> {
        let request = helpers::make_request(Method::GET, "/api/v1/castings?page=abc")?;
        let response = helpers::send(test_router(), request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn page_beyond_last_is_empty_not_an_error() -> Result<()> {
        let (status, body): (_, ListCastingsResponse) =
            helpers::get_json(test_router(), "/api/v1/castings?page=99&limit=2").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.castings.is_empty());
        assert!(!body.has_more);
        Ok(())
    }
}

// ============================================================================
// Search
// ============================================================================

mod search {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct CastingResponse {
        id: String,
    }

    #[derive(Debug, Deserialize)]
    struct SearchResponse {
        results: Vec<CastingResponse>,
        query: String,
        count: usize,
    }

    #[tokio::test]
    async fn matches_are_case_insensitive_and_ordered() -> Result<()> {
        let (status, body): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=UNDERBODY").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.count, 1);
        assert_eq!(body.results[0].id, "B1");
        assert_eq!(body.query, "UNDERBODY");

        let (_, body): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=rocker").await?;
        let ids: Vec<&str> = body.results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["A1", "A2"]);
        Ok(())
    }

    #[tokio::test]
    async fn material_is_not_searched() -> Result<()> {
        let (_, body): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=AlSi10MnMg").await?;
        assert_eq!(body.count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn blank_query_returns_no_results() -> Result<()> {
        let (status, body): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=%20%20").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(body.results.is_empty());

        let (_, body): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search").await?;
        assert!(body.results.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn identical_queries_return_identical_order() -> Result<()> {
        let (_, first): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=casting").await?;
        let (_, second): (_, SearchResponse) =
            helpers::get_json(test_router(), "/api/v1/search?q=casting").await?;

        let first_ids: Vec<&str> = first.results.iter().map(|c| c.id.as_str()).collect();
        let second_ids: Vec<&str> = second.results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
        Ok(())
    }
}

// ============================================================================
// Export
// ============================================================================

mod export {
    use super::*;

    #[tokio::test]
    async fn export_is_a_named_json_attachment() -> Result<()> {
        let request = helpers::make_request(Method::GET, "/api/v1/castings/B1/export")?;
        let response = helpers::send(test_router(), request).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .context("Content-Disposition header should be present")?;
        assert_eq!(
            disposition.to_str()?,
            "attachment; filename=\"casting_B1.json\""
        );

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .context("Content-Type header should be present")?;
        assert_eq!(content_type.to_str()?, "application/json");
        Ok(())
    }

    #[tokio::test]
    async fn export_bytes_are_deterministic() -> Result<()> {
        let request = helpers::make_request(Method::GET, "/api/v1/castings/A1/export")?;
        let response = helpers::send(test_router(), request).await?;
        let (_, first) = helpers::response_body(response).await?;

        let request = helpers::make_request(Method::GET, "/api/v1/castings/A1/export")?;
        let response = helpers::send(test_router(), request).await?;
        let (_, second) = helpers::response_body(response).await?;

        assert_eq!(first, second);

        // The canonical bytes parse back into the full record.
        let record = crucible_catalog::deserialize(&first)
            .map_err(|e| anyhow::anyhow!("deserialize export: {e}"))?;
        assert_eq!(record.id, "A1");
        assert_eq!(record.description, "Front rocker casting");
        Ok(())
    }

    #[tokio::test]
    async fn export_of_unknown_id_is_404() -> Result<()> {
        let request = helpers::make_request(Method::GET, "/api/v1/castings/NOPE/export")?;
        let response = helpers::send(test_router(), request).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}

// ============================================================================
// Reload
// ============================================================================

mod reload {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ReloadResponse {
        records: usize,
    }

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        code: String,
    }

    #[derive(Debug, Deserialize)]
    struct ListCastingsResponse {
        total: usize,
    }

    fn router_with_csv(path: &std::path::Path) -> axum::Router {
        let config = Config {
            debug: true,
            catalog_csv: Some(path.to_path_buf()),
            ..Config::default()
        };
        Server::builder()
            .config(config)
            .catalog_store(sample_store())
            .build()
            .test_router()
    }

    #[tokio::test]
    async fn reload_swaps_in_the_new_generation() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"id,description\nZ9,Replacement casting\n")?;

        let router = router_with_csv(file.path());

        let (status, body): (_, ReloadResponse) =
            helpers::post_json(router.clone(), "/api/v1/catalog/reload").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.records, 1);

        let (_, list): (_, ListCastingsResponse) =
            helpers::get_json(router, "/api/v1/castings").await?;
        assert_eq!(list.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn rejected_reload_leaves_the_prior_catalog_serving() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"id,description\nA,first\nA,second\n")?;

        let router = router_with_csv(file.path());

        let (status, body): (_, ErrorBody) =
            helpers::post_json(router.clone(), "/api/v1/catalog/reload").await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "LOAD_REJECTED");

        // The original three records are still served.
        let (_, list): (_, ListCastingsResponse) =
            helpers::get_json(router, "/api/v1/castings").await?;
        assert_eq!(list.total, 3);
        Ok(())
    }

    #[tokio::test]
    async fn reload_without_a_source_is_a_bad_request() -> Result<()> {
        let (status, body): (_, ErrorBody) =
            helpers::post_json(test_router(), "/api/v1/catalog/reload").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "BAD_REQUEST");
        Ok(())
    }
}
