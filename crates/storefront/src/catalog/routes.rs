//! Catalog route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check
//! GET  /stock/{id}      - Stock record
//! GET  /products        - Product listing
//! GET  /products/{id}   - Product detail
//! ```

use std::future::Future;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_core::{ProductId, StockRecord};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use super::CatalogProduct;
use crate::state::AppState;

/// Lookup failure, rendered as a JSON 404.
#[derive(Debug)]
struct NotFound(String);

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        tracing::debug!(resource = %self.0, "Catalog lookup missed");
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Not found: {}", self.0) })),
        )
            .into_response()
    }
}

/// Create all routes for the catalog server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stock/{id}", get(stock))
        .route("/products", get(products))
        .route("/products/{id}", get(product))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the catalog until `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("catalog listening on {}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn stock(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<StockRecord>, NotFound> {
    state
        .catalog()
        .stock(id)
        .map(Json)
        .ok_or_else(|| NotFound(format!("stock/{id}")))
}

async fn products(State(state): State<AppState>) -> Json<Vec<CatalogProduct>> {
    Json(state.catalog().products().to_vec())
}

#[instrument(skip(state))]
async fn product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<CatalogProduct>, NotFound> {
    state
        .catalog()
        .product(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| NotFound(format!("products/{id}")))
}
