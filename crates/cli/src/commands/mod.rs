//! CLI command implementations.

pub mod cart;
pub mod serve;

use rocketshoes_storefront::ApiError;
use rocketshoes_storefront::catalog::CatalogError;
use rocketshoes_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that abort a command.
///
/// Cart rejections (out of stock, failed API calls) are not errors here:
/// they are printed as notifications and the command still succeeds.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A command-line argument is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP client could not be created.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Catalog fixture could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Server I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
