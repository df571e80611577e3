//! Catalog fixture server command.
//!
//! # Usage
//!
//! ```bash
//! rocketshoes serve --db server.json --port 3333
//! ```

use rocketshoes_storefront::catalog::{self, Catalog};
use rocketshoes_storefront::config::CatalogConfig;
use rocketshoes_storefront::state::AppState;

use super::CliError;

/// Load the fixture file and serve it until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns `CliError` if the fixture cannot be loaded or the address cannot be bound.
pub async fn run(config: &CatalogConfig) -> Result<(), CliError> {
    let catalog = Catalog::from_file(&config.db_path)?;
    tracing::info!(
        products = catalog.products().len(),
        db = %config.db_path.display(),
        "Catalog loaded"
    );

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    catalog::serve(listener, AppState::new(catalog), shutdown_signal()).await?;
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
