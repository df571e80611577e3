//! Cart error handling with Sentry breadcrumbs.
//!
//! [`CartError`] is internal to the cart store: each operation catches it at
//! its boundary and turns it into a [`Notification`]. Callers only ever see an
//! [`Outcome`].

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::notify::Notification;

/// Why a cart operation was aborted.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the stock record.
    #[error("Out of stock: product {product_id} requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// No cart entry for the product.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Stock or product API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// The cart operation an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartError {
    /// Map the error to the message shown to the shopper.
    ///
    /// `NotFound` and API failures collapse into the operation's generic
    /// failure message.
    #[must_use]
    pub const fn notification(&self, operation: CartOperation) -> Notification {
        match (self, operation) {
            (Self::OutOfStock { .. }, CartOperation::Add) => Notification::AddOutOfStock,
            (Self::OutOfStock { .. }, CartOperation::Update) => Notification::UpdateOutOfStock,
            (_, CartOperation::Add) => Notification::AddFailed,
            (_, CartOperation::Remove) => Notification::RemoveFailed,
            (_, CartOperation::Update) => Notification::UpdateFailed,
        }
    }
}

/// Result of a cart operation as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new cart was committed.
    Applied,
    /// Nothing to do (e.g. a non-positive quantity update).
    Unchanged,
    /// Aborted; the cart is untouched and the shopper was notified.
    Rejected(Notification),
}

impl Outcome {
    /// Whether a new cart was committed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The notification emitted, if the operation was rejected.
    #[must_use]
    pub const fn notification(&self) -> Option<Notification> {
        match self {
            Self::Rejected(notification) => Some(*notification),
            Self::Applied | Self::Unchanged => None,
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
