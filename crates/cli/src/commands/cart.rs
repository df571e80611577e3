//! Cart session commands.
//!
//! Each invocation is one session: the cart is loaded from the data
//! directory, one operation is applied, and the resulting cart is printed.
//!
//! # Usage
//!
//! ```bash
//! rocketshoes cart add 1
//! rocketshoes cart update 1 3
//! rocketshoes --data-dir /tmp/cart cart show
//! ```

use std::fmt::Write as _;

use rocketshoes_core::{CurrencyCode, Price, Product, ProductId, UpdateProductAmount};
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::{
    ApiClient, CartStore, CartSummary, CollectingNotifier, FileStorage, Notification, Notifier,
    Outcome, TracingNotifier,
};

use super::CliError;

/// Forwards to the log and keeps a copy for the final report.
#[derive(Clone, Default)]
struct SessionNotifier {
    collected: CollectingNotifier,
}

impl Notifier for SessionNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification);
        self.collected.notify(notification);
    }
}

type SessionStore = CartStore<ApiClient, FileStorage, SessionNotifier>;

fn open_session(config: &StorefrontConfig) -> Result<(SessionStore, SessionNotifier), CliError> {
    let api = ApiClient::new(&config.api)?;
    let storage = FileStorage::new(&config.data_dir);
    let notifier = SessionNotifier::default();

    tracing::debug!(
        api = %config.api.base_url,
        data_dir = %config.data_dir.display(),
        "Opening cart session"
    );

    Ok((CartStore::load(api, storage, notifier.clone()), notifier))
}

/// Print the persisted cart.
///
/// # Errors
///
/// Returns `CliError` if the API client cannot be created.
pub fn show(config: &StorefrontConfig) -> Result<(), CliError> {
    let (store, _) = open_session(config)?;
    print_report(&store, config.currency, None, &[]);
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CliError` if the API client cannot be created.
pub async fn add(config: &StorefrontConfig, product_id: ProductId) -> Result<(), CliError> {
    let (store, notifier) = open_session(config)?;
    let outcome = store.add_product(product_id).await;
    print_report(&store, config.currency, Some(outcome), &notifier.collected.drain());
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns `CliError` if the API client cannot be created.
pub async fn remove(config: &StorefrontConfig, product_id: ProductId) -> Result<(), CliError> {
    let (store, notifier) = open_session(config)?;
    let outcome = store.remove_product(product_id).await;
    print_report(&store, config.currency, Some(outcome), &notifier.collected.drain());
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns `CliError` if the API client cannot be created.
pub async fn update(
    config: &StorefrontConfig,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CliError> {
    let (store, notifier) = open_session(config)?;
    let outcome = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    print_report(&store, config.currency, Some(outcome), &notifier.collected.drain());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_report(
    store: &SessionStore,
    currency: CurrencyCode,
    outcome: Option<Outcome>,
    notifications: &[Notification],
) {
    if let Some(outcome) = outcome {
        tracing::debug!(?outcome, "Cart operation finished");
    }
    let cart = store.snapshot();
    print!(
        "{}",
        render(&cart, &store.summary(), currency, notifications)
    );
}

/// Render the cart as a plain-text table.
fn render(
    cart: &[Product],
    summary: &CartSummary,
    currency: CurrencyCode,
    notifications: &[Notification],
) -> String {
    let mut out = String::new();

    for notification in notifications {
        let _ = writeln!(out, "! {notification}");
    }

    if cart.is_empty() {
        out.push_str("Cart is empty\n");
        return out;
    }

    let _ = writeln!(out, "{:<6} {:>4} {:>12}  TITLE", "ID", "QTY", "PRICE");
    for product in cart {
        let price = product
            .details
            .price()
            .map_or_else(|| "-".to_string(), |amount| Price::new(amount, currency).display());
        let title = product.details.title().unwrap_or("(untitled)");
        let _ = writeln!(
            out,
            "{:<6} {:>4} {:>12}  {}",
            product.id.as_i32(),
            product.amount,
            price,
            title
        );
    }

    let _ = writeln!(
        out,
        "{} item(s) across {} product(s), subtotal {}",
        summary.item_count,
        summary.distinct_items,
        summary.subtotal_price(currency)
    );
    out
}
