//! Stock-validated cart store.
//!
//! Holds the shopper's ordered line-items, applies mutations after checking
//! them against the live stock API, publishes every committed cart to
//! subscribers and mirrors it into a persistence slot.
//!
//! # Operations
//!
//! ```text
//! add_product(id)                      GET /stock/{id}, then GET /products/{id} for new entries
//! remove_product(id)                   local only
//! update_product_amount({id, amount})  GET /stock/{id}; amount <= 0 is ignored
//! ```
//!
//! # Concurrency
//!
//! Mutations are serialized: each one holds the writer lock from the moment
//! it reads the current cart until it commits. Two overlapping `add_product`
//! calls for the same product therefore both count. Reads (`cart`,
//! `subscribe`) never wait on the lock.
//!
//! No timeout is applied to API calls unless the client is configured with
//! one; a stalled call stalls every queued mutation behind it.

mod summary;

pub use summary::CartSummary;

use std::sync::Arc;

use rocketshoes_core::{Product, ProductId, StockRecord, UpdateProductAmount};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::api::StoreApi;
use crate::error::{CartError, CartOperation, Outcome, add_breadcrumb};
use crate::notify::Notifier;
use crate::storage::{CART_STORAGE_KEY, CartStorage, load_cart};

/// Shared, immutable view of a committed cart.
pub type CartSnapshot = Arc<Vec<Product>>;

/// The cart for one shopping session.
pub struct CartStore<A, S, N> {
    api: A,
    storage: S,
    notifier: N,
    current: watch::Sender<CartSnapshot>,
    writer: Mutex<PersistState>,
}

/// Serialized form of the cart as last written to storage.
struct PersistState {
    last_persisted: String,
}

impl<A, S, N> CartStore<A, S, N>
where
    A: StoreApi,
    S: CartStorage,
    N: Notifier,
{
    /// Create a store seeded from the persistence slot.
    ///
    /// A missing or unreadable slot yields an empty cart.
    pub fn load(api: A, storage: S, notifier: N) -> Self {
        let cart = load_cart(&storage);
        debug!(items = cart.len(), "Cart loaded from storage");
        Self::with_cart(api, storage, notifier, cart)
    }

    /// Create a store with an explicit initial cart. Nothing is written until
    /// the first mutation that changes it.
    pub fn with_cart(api: A, storage: S, notifier: N, cart: Vec<Product>) -> Self {
        let last_persisted = serialize_cart(&cart).unwrap_or_default();
        let (current, _) = watch::channel(Arc::new(cart));

        Self {
            api,
            storage,
            notifier,
            current,
            writer: Mutex::new(PersistState { last_persisted }),
        }
    }

    /// Current cart, in first-add order.
    #[must_use]
    pub fn cart(&self) -> Vec<Product> {
        self.current.borrow().to_vec()
    }

    /// Current cart without copying the entries.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        Arc::clone(&self.current.borrow())
    }

    /// Receive every committed cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.current.subscribe()
    }

    /// Item count and subtotal of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from_products(&self.current.borrow())
    }

    /// Add one unit of a product.
    ///
    /// Increments an existing entry, or fetches the product and appends it
    /// with an amount of 1.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Outcome {
        let mut writer = self.writer.lock().await;

        match self.try_add(product_id).await {
            Ok(cart) => {
                self.commit(&mut writer, cart);
                let id = product_id.to_string();
                breadcrumb("Added product", &[("product_id", id.as_str())]);
                Outcome::Applied
            }
            Err(e) => self.reject(&e, CartOperation::Add),
        }
    }

    /// Remove a product's entry entirely.
    ///
    /// Makes no API calls; only waits for in-flight mutations to finish.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Outcome {
        let mut writer = self.writer.lock().await;

        match self.try_remove(product_id) {
            Ok(cart) => {
                self.commit(&mut writer, cart);
                let id = product_id.to_string();
                breadcrumb("Removed product", &[("product_id", id.as_str())]);
                Outcome::Applied
            }
            Err(e) => self.reject(&e, CartOperation::Remove),
        }
    }

    /// Set a product's quantity.
    ///
    /// Amounts of zero or below are ignored without a notification; removing
    /// an entry goes through [`Self::remove_product`].
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) -> Outcome {
        let Ok(requested) = u64::try_from(update.amount) else {
            return Outcome::Unchanged;
        };
        if requested == 0 {
            return Outcome::Unchanged;
        }

        let mut writer = self.writer.lock().await;

        match self.try_update(update.product_id, requested).await {
            Ok(cart) => {
                self.commit(&mut writer, cart);
                let (id, amount) = (update.product_id.to_string(), requested.to_string());
                breadcrumb(
                    "Updated product amount",
                    &[("product_id", id.as_str()), ("amount", amount.as_str())],
                );
                Outcome::Applied
            }
            Err(e) => self.reject(&e, CartOperation::Update),
        }
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Vec<Product>, CartError> {
        let mut cart = self.cart();
        let existing = cart.iter().position(|p| p.id == product_id);
        let desired = existing
            .and_then(|index| cart.get(index))
            .map_or(1, |p| u64::from(p.amount) + 1);

        let stock = self.api.get_stock(product_id).await?;
        let amount = checked_amount(product_id, desired, &stock)?;

        match existing.and_then(|index| cart.get_mut(index)) {
            Some(entry) => entry.amount = amount,
            None => {
                let details = self.api.get_product(product_id).await?;
                cart.push(Product::from_details(product_id, details));
            }
        }

        Ok(cart)
    }

    fn try_remove(&self, product_id: ProductId) -> Result<Vec<Product>, CartError> {
        let mut cart = self.cart();
        let index = cart
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        cart.remove(index);
        Ok(cart)
    }

    async fn try_update(
        &self,
        product_id: ProductId,
        requested: u64,
    ) -> Result<Vec<Product>, CartError> {
        let stock = self.api.get_stock(product_id).await?;
        let amount = checked_amount(product_id, requested, &stock)?;

        let mut cart = self.cart();
        let entry = cart
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CartError::NotFound(product_id))?;
        entry.amount = amount;

        Ok(cart)
    }

    /// Publish a new cart and persist it if its serialized form changed.
    fn commit(&self, writer: &mut PersistState, cart: Vec<Product>) {
        let cart = Arc::new(cart);
        self.current.send_replace(Arc::clone(&cart));
        info!(items = cart.len(), "Cart committed");

        let serialized = match serialize_cart(&cart) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart, skipping persistence");
                return;
            }
        };

        if serialized == writer.last_persisted {
            debug!("Cart unchanged, skipping persistence");
            return;
        }

        match self.storage.set(CART_STORAGE_KEY, &serialized) {
            Ok(()) => writer.last_persisted = serialized,
            Err(e) => warn!(error = %e, "Failed to persist cart"),
        }
    }

    fn reject(&self, error: &CartError, operation: CartOperation) -> Outcome {
        match error {
            CartError::OutOfStock { .. } => info!(error = %error, "Cart change rejected"),
            CartError::NotFound(_) | CartError::Api(_) => {
                warn!(error = %error, ?operation, "Cart operation failed");
            }
        }

        let notification = error.notification(operation);
        self.notifier.notify(notification);
        Outcome::Rejected(notification)
    }
}

/// Validate a requested quantity against a stock record.
fn checked_amount(
    product_id: ProductId,
    requested: u64,
    stock: &StockRecord,
) -> Result<u32, CartError> {
    u32::try_from(requested)
        .ok()
        .filter(|amount| *amount <= stock.amount)
        .ok_or(CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        })
}

fn breadcrumb(message: &str, data: &[(&str, &str)]) {
    add_breadcrumb("cart", message, Some(data));
}

fn serialize_cart(cart: &[Product]) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}
