//! Stock and product fixture catalog.
//!
//! Serves the collaborator endpoints the cart consumes from a JSON file:
//!
//! ```json
//! {
//!   "stock":    [{ "id": 1, "amount": 3 }],
//!   "products": [{ "id": 1, "title": "Running shoe", "price": 179.9, "image": "https://..." }]
//! }
//! ```

mod routes;

pub use routes::{router, serve};

use std::collections::HashMap;
use std::path::Path;

use rocketshoes_core::{ProductDetails, ProductId, StockRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fixture file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Fixture file is not a valid catalog.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: ProductDetails,
}

/// In-memory catalog keyed by product ID.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stock: HashMap<ProductId, StockRecord>,
    products: Vec<CatalogProduct>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    stock: Vec<StockRecord>,
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

impl Catalog {
    /// Build a catalog from stock records and products.
    #[must_use]
    pub fn new(stock: Vec<StockRecord>, products: Vec<CatalogProduct>) -> Self {
        Self {
            stock: stock.into_iter().map(|record| (record.id, record)).collect(),
            products,
        }
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON does not match the catalog shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.stock, file.products))
    }

    /// Load a catalog from a fixture file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Stock record for a product.
    #[must_use]
    pub fn stock(&self, id: ProductId) -> Option<StockRecord> {
        self.stock.get(&id).copied()
    }

    /// Replace a product's available stock.
    pub fn set_stock(&mut self, id: ProductId, amount: u32) {
        self.stock.insert(id, StockRecord { id, amount });
    }

    /// Product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products in file order.
    #[must_use]
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }
}
