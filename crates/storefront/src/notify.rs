//! User-facing notifications (toasts).
//!
//! Cart operations never return errors to the caller. Failures and stock
//! rejections are reported through a [`Notifier`] with one of five fixed
//! messages.

use std::sync::{Arc, Mutex, PoisonError};

/// A user-visible cart message. The text never depends on the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// `add_product` would exceed the available stock.
    AddOutOfStock,
    /// `add_product` failed for any other reason.
    AddFailed,
    /// `remove_product` failed.
    RemoveFailed,
    /// `update_product_amount` would exceed the available stock.
    UpdateOutOfStock,
    /// `update_product_amount` failed for any other reason.
    UpdateFailed,
}

impl Notification {
    /// Message shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AddOutOfStock => "Requested quantity is out of stock",
            Self::UpdateOutOfStock => "Requested quantity exceeds available stock",
            Self::AddFailed => "Could not add product to cart",
            Self::RemoveFailed => "Could not remove product from cart",
            Self::UpdateFailed => "Could not update product quantity",
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Fire-and-forget message channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Emits notifications as `info` events.
///
/// The cart logs the cause of a failure at `warn` itself, so the message shown
/// to the shopper only becomes a breadcrumb.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(kind = ?notification, "{}", notification.message());
    }
}

/// Collects notifications in order. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingNotifier {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything received so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: [Notification; 5] = [
        Notification::AddOutOfStock,
        Notification::AddFailed,
        Notification::RemoveFailed,
        Notification::UpdateOutOfStock,
        Notification::UpdateFailed,
    ];

    #[test]
    fn test_every_kind_has_its_own_message() {
        let messages: HashSet<_> = ALL.iter().map(Notification::message).collect();
        assert_eq!(messages.len(), ALL.len());
    }

    #[test]
    fn test_collecting_notifier_preserves_order() {
        let notifier = CollectingNotifier::new();
        notifier.notify(Notification::AddFailed);
        notifier.notify(Notification::RemoveFailed);

        assert_eq!(
            notifier.drain(),
            vec![Notification::AddFailed, Notification::RemoveFailed]
        );
        assert!(notifier.notifications().is_empty());
    }
}
