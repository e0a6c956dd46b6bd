//! API server implementation.
//!
//! Provides health, ready, and API endpoints for the casting catalog.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crucible_catalog::{CatalogStore, QueryEngine, SharedCatalog};
use crucible_core::{Error, Result};

use crate::config::{Config, CorsConfig};

// ============================================================================
// Health and Ready Responses
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ReadyResponse {
    /// Service readiness status.
    pub ready: bool,
    /// Records in the current catalog generation.
    pub records: usize,
    /// Optional message about readiness state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all request handlers.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Swappable handle to the current catalog generation.
    pub catalog: Arc<SharedCatalog>,
}

impl AppState {
    /// Creates new application state over a catalog handle.
    #[must_use]
    pub fn new(config: Config, catalog: Arc<SharedCatalog>) -> Self {
        Self { config, catalog }
    }

    /// Returns a query engine over the current catalog generation.
    ///
    /// One engine per request: every handler invocation completes against
    /// a single, internally consistent snapshot.
    #[must_use]
    pub fn engine(&self) -> QueryEngine {
        QueryEngine::with_limits(self.catalog.current(), self.config.page_limits())
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint handler.
///
/// Returns 200 OK if the service is alive. This is a shallow check
/// that doesn't verify the catalog.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check endpoint handler.
///
/// Ready means a non-empty catalog generation is in service.
async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.catalog.current();
    if store.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                records: 0,
                message: Some("catalog is empty".to_string()),
            }),
        )
    } else {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                records: store.len(),
                message: None,
            }),
        )
    }
}

// ============================================================================
// Server
// ============================================================================

/// The Crucible API server.
pub struct Server {
    config: Config,
    catalog: Arc<SharedCatalog>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("catalog", &"<SharedCatalog>")
            .finish()
    }
}

impl Server {
    /// Creates a new server with the given configuration and an empty
    /// catalog.
    ///
    /// Use [`with_catalog`](Self::with_catalog) for a preloaded store.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_catalog(config, CatalogStore::empty())
    }

    /// Creates a new server over a loaded catalog store.
    #[must_use]
    pub fn with_catalog(config: Config, store: CatalogStore) -> Self {
        Self {
            config,
            catalog: Arc::new(SharedCatalog::new(store)),
        }
    }

    /// Creates a new `ServerBuilder`.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates the router with all routes and middleware.
    fn create_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            self.config.clone(),
            Arc::clone(&self.catalog),
        ));

        let cors = self.build_cors_layer();

        Router::new()
            // Health and ready endpoints
            .route("/health", get(health))
            .route("/ready", get(ready))
            // API routes
            .nest("/api/v1", crate::routes::api_v1_routes())
            // Middleware (order matters): trace outermost for timing, then CORS.
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            // Shared state
            .with_state(state)
    }

    /// Builds the CORS layer from configuration.
    fn build_cors_layer(&self) -> CorsLayer {
        let cors_config = &self.config.cors;
        let cors = Self::build_cors_base(cors_config);
        Self::apply_cors_allowed_origins(cors, cors_config)
    }

    fn build_cors_base(cors_config: &CorsConfig) -> CorsLayer {
        CorsLayer::new()
            // Read-only API plus the reload trigger
            .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            // Expose headers the browser needs for downloads
            .expose_headers([
                header::CONTENT_TYPE,
                header::CONTENT_LENGTH,
                header::CONTENT_DISPOSITION,
            ])
            .max_age(Duration::from_secs(cors_config.max_age_seconds))
    }

    fn cors_allows_any_origin(cors_config: &CorsConfig) -> bool {
        cors_config.allowed_origins.len() == 1
            && cors_config
                .allowed_origins
                .first()
                .is_some_and(|origin| origin == "*")
    }

    fn parse_cors_origins(cors_config: &CorsConfig) -> Vec<HeaderValue> {
        let mut allowed = Vec::new();
        for origin in &cors_config.allowed_origins {
            match HeaderValue::from_str(origin) {
                Ok(value) => allowed.push(value),
                Err(_) => {
                    tracing::error!(
                        origin = %origin,
                        "Invalid CORS origin; expected a valid HeaderValue"
                    );
                }
            }
        }
        allowed
    }

    fn apply_cors_allowed_origins(cors: CorsLayer, cors_config: &CorsConfig) -> CorsLayer {
        if cors_config.allowed_origins.is_empty() {
            return cors;
        }

        if Self::cors_allows_any_origin(cors_config) {
            return cors.allow_origin(Any);
        }

        if cors_config
            .allowed_origins
            .iter()
            .any(|origin| origin == "*")
        {
            tracing::error!(
                origins = ?cors_config.allowed_origins,
                "Invalid CORS config: '*' must be the only allowed origin"
            );
            return cors;
        }

        let allowed = Self::parse_cors_origins(cors_config);

        if allowed.is_empty() {
            tracing::warn!("All configured CORS origins were invalid; disabling CORS");
            cors
        } else {
            tracing::info!(origins = ?cors_config.allowed_origins, "CORS configured");
            cors.allow_origin(AllowOrigin::list(allowed))
        }
    }

    /// Starts the server and blocks until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the server
    /// cannot bind to the port.
    pub async fn serve(&self) -> Result<()> {
        self.validate_config()?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let router = self.create_router();

        tracing::info!(
            http_port = self.config.http_port,
            records = self.catalog.current().len(),
            "Starting Crucible API server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::internal(format!("failed to bind to {addr}: {e}")))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("server error: {e}")))?;

        Ok(())
    }

    /// Creates a test router for the server.
    ///
    /// This is useful for integration tests where you want to test
    /// the routes without actually binding to a port.
    #[doc(hidden)]
    #[must_use]
    pub fn test_router(&self) -> Router {
        self.create_router()
    }

    fn validate_config(&self) -> Result<()> {
        // Enforce "no wildcard in production" for CORS.
        if !self.config.debug
            && self
                .config
                .cors
                .allowed_origins
                .iter()
                .any(|origin| origin == "*")
        {
            return Err(Error::invalid_parameter(
                "cors.allowed_origins cannot include '*' when debug=false",
            ));
        }

        if !self.config.debug && self.config.catalog_csv.is_none() {
            return Err(Error::invalid_parameter(
                "catalog_csv is required when debug=false",
            ));
        }

        if self.config.page.default_limit < 1 {
            return Err(Error::invalid_parameter("page.default_limit must be >= 1"));
        }
        if self.config.page.default_limit > self.config.page.max_limit {
            return Err(Error::invalid_parameter(
                "page.default_limit cannot exceed page.max_limit",
            ));
        }

        Ok(())
    }
}

/// Builder for constructing a server.
pub struct ServerBuilder {
    config: Config,
    store: CatalogStore,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    /// Creates a builder with default configuration and an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            store: CatalogStore::empty(),
        }
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets debug mode.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Sets the initial catalog store.
    #[must_use]
    pub fn catalog_store(mut self, store: CatalogStore) -> Self {
        self.store = store;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server::with_catalog(self.config, self.store)
    }
}
