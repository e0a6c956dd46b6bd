//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crucible_catalog::PageLimits;
use crucible_core::{Error, Result};

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins. Empty disables CORS entirely; a single `*` allows
    /// any origin (debug only).
    pub allowed_origins: Vec<String>,
    /// Preflight cache duration in seconds.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
        }
    }
}

/// Pagination configuration for the browse endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageConfig {
    /// Page size when the caller does not specify one.
    pub default_limit: usize,
    /// Hard cap on the page size; larger requests are clamped.
    pub max_limit: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_limit: limits.default,
            max_limit: limits.max,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// HTTP listen port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Debug mode: pretty logs and relaxed validation.
    #[serde(default)]
    pub debug: bool,
    /// Path to the catalog CSV source. Required when `debug` is false;
    /// also the source re-read by the reload endpoint.
    #[serde(default)]
    pub catalog_csv: Option<PathBuf>,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Pagination configuration.
    #[serde(default)]
    pub page: PageConfig,
}

fn default_http_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            debug: false,
            catalog_csv: None,
            cors: CorsConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `CRUCIBLE_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unparseable values.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_u16("CRUCIBLE_HTTP_PORT")? {
            config.http_port = port;
        }
        if let Some(debug) = env_bool("CRUCIBLE_DEBUG")? {
            config.debug = debug;
        }
        if let Some(path) = env_string("CRUCIBLE_CATALOG_CSV") {
            config.catalog_csv = Some(PathBuf::from(path));
        }

        if let Some(origins) = env_string("CRUCIBLE_CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = parse_cors_allowed_origins(&origins);
        }
        if let Some(max_age) = env_u64("CRUCIBLE_CORS_MAX_AGE_SECONDS")? {
            config.cors.max_age_seconds = max_age;
        }

        if let Some(limit) = env_usize("CRUCIBLE_PAGE_DEFAULT_LIMIT")? {
            config.page.default_limit = limit;
        }
        if let Some(limit) = env_usize("CRUCIBLE_PAGE_MAX_LIMIT")? {
            config.page.max_limit = limit;
        }

        Ok(config)
    }

    /// Returns the pagination limits the engine should enforce.
    #[must_use]
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default: self.page.default_limit,
            max: self.page.max_limit,
        }
    }
}

fn parse_cors_allowed_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u16(name: &str) -> Result<Option<u16>> {
    env_string(name)
        .map(|v| {
            v.parse::<u16>()
                .map_err(|_| Error::invalid_parameter(format!("{name} must be a port number")))
        })
        .transpose()
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    env_string(name)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| Error::invalid_parameter(format!("{name} must be an integer")))
        })
        .transpose()
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    env_string(name)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| Error::invalid_parameter(format!("{name} must be an integer")))
        })
        .transpose()
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    env_string(name).map(|v| parse_bool(name, &v)).transpose()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::invalid_parameter(format!(
            "{name} must be true or false (got {value})"
        ))),
    }
}
