//! Stock and product API collaborators.
//!
//! # Endpoints
//!
//! ```text
//! GET /stock/{id}     -> { "id": 1, "amount": 3 }
//! GET /products/{id}  -> { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! ```
//!
//! The cart talks to these through the [`StoreApi`] trait so the HTTP client
//! can be swapped for an in-memory fake in tests.

mod client;

pub use client::ApiClient;

use std::future::Future;
use std::sync::Arc;

use rocketshoes_core::{ProductDetails, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when calling the stock or product API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status (including 404 for unknown IDs).
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Read access to the authoritative stock and product records.
pub trait StoreApi: Send + Sync {
    /// Fetch the live stock record for a product.
    fn get_stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockRecord, ApiError>> + Send;

    /// Fetch the descriptive fields of a product.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductDetails, ApiError>> + Send;
}

impl<T: StoreApi> StoreApi for Arc<T> {
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, ApiError> {
        (**self).get_stock(id).await
    }

    async fn get_product(&self, id: ProductId) -> Result<ProductDetails, ApiError> {
        (**self).get_product(id).await
    }
}
