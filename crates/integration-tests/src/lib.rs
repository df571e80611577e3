//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! The tests need no external services: [`TestCatalog`] boots the catalog
//! server on an ephemeral local port and [`TempDataDir`] gives each test its
//! own persistence directory.

use std::path::{Path, PathBuf};

use rocketshoes_storefront::catalog::{self, Catalog};
use rocketshoes_storefront::config::{ApiConfig, parse_base_url};
use rocketshoes_storefront::state::AppState;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

/// Fixture used by most tests.
pub const DEFAULT_CATALOG: &str = r#"{
    "stock": [
        {"id": 1, "amount": 3},
        {"id": 2, "amount": 5},
        {"id": 3, "amount": 0},
        {"id": 4, "amount": 10}
    ],
    "products": [
        {"id": 1, "title": "Running shoe", "price": 179.9, "image": "https://cdn.example.com/1.jpg"},
        {"id": 2, "title": "Trail boot", "price": 239.9, "image": "https://cdn.example.com/2.jpg"},
        {"id": 3, "title": "Sandal", "price": 59.9, "image": "https://cdn.example.com/3.jpg"}
    ]
}"#;

/// A catalog server running on `127.0.0.1:<ephemeral>`.
///
/// Stops when dropped.
pub struct TestCatalog {
    pub base_url: Url,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestCatalog {
    /// Start a server for the given fixture JSON.
    ///
    /// # Panics
    ///
    /// Panics if the fixture is invalid or no local port can be bound.
    pub async fn start(fixture: &str) -> Self {
        let catalog = Catalog::from_json(fixture).expect("Invalid catalog fixture");
        let state = AppState::new(catalog);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let (tx, rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = catalog::serve(listener, server_state, shutdown).await {
                panic!("Catalog server failed: {e}");
            }
        });

        let base_url = parse_base_url(&format!("http://{addr}")).expect("Invalid base URL");

        Self {
            base_url,
            state,
            shutdown: Some(tx),
            handle,
        }
    }

    /// Start a server with [`DEFAULT_CATALOG`].
    pub async fn start_default() -> Self {
        Self::start(DEFAULT_CATALOG).await
    }

    /// API configuration pointing at this server.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    /// Stop the server and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for TestCatalog {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A unique directory under the system temp dir, removed on drop.
pub struct TempDataDir {
    path: PathBuf,
}

impl TempDataDir {
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("rocketshoes-it-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
