//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Cart session
//! - `ROCKETSHOES_API_URL` - Base URL of the stock/product API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_DATA_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `ROCKETSHOES_API_TIMEOUT_SECS` - Request timeout for API calls (default: none)
//! - `ROCKETSHOES_CURRENCY` - ISO 4217 code prices are shown in (default: `BRL`)
//!
//! ## Catalog server
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 3333)
//! - `CATALOG_DB` - JSON fixture file with `stock` and `products` (default: `server.json`)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Stock and product API settings
    pub api: ApiConfig,
    /// Directory for the file-backed persistence slot
    pub data_dir: PathBuf,
    /// Currency product prices are denominated in
    pub currency: CurrencyCode,
    /// Catalog fixture server settings
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Stock and product API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Catalog fixture server configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path to the JSON fixture file
    pub db_path: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("ROCKETSHOES_DATA_DIR", ".rocketshoes"));
        let currency = get_optional_env("ROCKETSHOES_CURRENCY")
            .map(|value| {
                value
                    .parse::<CurrencyCode>()
                    .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_CURRENCY".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            api,
            data_dir,
            currency,
            catalog,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    /// Build an API configuration for the given base URL, without a timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("ROCKETSHOES_API_URL", "http://localhost:3333");
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e))?;

        let timeout = get_optional_env("ROCKETSHOES_API_TIMEOUT_SECS")
            .map(|value| {
                value.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "ROCKETSHOES_API_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self { base_url, timeout })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("CATALOG_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CATALOG_PORT", "3333")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_PORT".to_string(), e.to_string()))?;
        let db_path = PathBuf::from(get_env_or_default("CATALOG_DB", "server.json"));

        Ok(Self {
            host,
            port,
            db_path,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an API base URL, forcing a trailing slash so relative joins keep any
/// path prefix (`http://host/api` + `stock/1` -> `http://host/api/stock/1`).
///
/// # Errors
///
/// Returns a description of the problem if `raw` is not an absolute URL.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("{raw} cannot be used as a base URL"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("http://localhost:3333").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/");

        let url = parse_base_url("https://api.example.com/v1").unwrap();
        assert_eq!(url.join("stock/1").unwrap().as_str(), "https://api.example.com/v1/stock/1");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:shop@example.com").is_err());
    }

    #[test]
    fn test_catalog_socket_addr() {
        let config = CatalogConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            db_path: PathBuf::from("server.json"),
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }
}
