//! HTTP implementation of [`StoreApi`].
//!
//! Product details are cached using `moka` (5-minute TTL). Stock is always
//! fetched live.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rocketshoes_core::{ProductDetails, ProductId, StockRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, StoreApi};
use crate::config::ApiConfig;

/// Client for the stock and product API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, ProductDetails>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// GET a JSON resource relative to the base URL.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Parse(format!("Invalid request path {path}: {e}")))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: message.chars().take(500).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl StoreApi for ApiClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<StockRecord, ApiError> {
        let stock: StockRecord = self.get_json(&format!("stock/{id}")).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<ProductDetails, ApiError> {
        if let Some(details) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(details);
        }

        let details: ProductDetails = self.get_json(&format!("products/{id}")).await?;
        self.inner.products.insert(id, details.clone()).await;
        Ok(details)
    }
}
