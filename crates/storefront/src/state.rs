//! Catalog server state shared across handlers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use rocketshoes_core::ProductId;

use crate::catalog::Catalog;

/// Application state shared across all catalog handlers.
///
/// This struct is cheaply cloneable via `Arc`. Clones share the catalog, so
/// a test holding a clone can adjust stock while the server is running.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: RwLock<Catalog>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: RwLock::new(catalog),
            }),
        }
    }

    /// Read access to the catalog.
    pub fn catalog(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace a product's available stock.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_stock(id, amount);
    }
}
