//! `crucible-api` binary entrypoint.
//!
//! Loads configuration from environment variables, ingests the catalog
//! CSV, and starts the HTTP server.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use anyhow::Result;

use crucible_api::config::Config;
use crucible_api::server::Server;
use crucible_catalog::{CatalogStore, ingest};
use crucible_core::observability::{LogFormat, init_logging};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(choose_log_format(&config));

    let store = if let Some(path) = config.catalog_csv.as_deref() {
        ingest::load_csv_path(path)
            .map_err(|e| anyhow::anyhow!("catalog load failed: {e}"))?
    } else {
        if !config.debug {
            anyhow::bail!("CRUCIBLE_CATALOG_CSV is required when CRUCIBLE_DEBUG=false");
        }
        tracing::warn!("CRUCIBLE_CATALOG_CSV not set; starting with an empty catalog (debug only)");
        CatalogStore::empty()
    };

    let server = Server::with_catalog(config, store);
    server.serve().await?;
    Ok(())
}
