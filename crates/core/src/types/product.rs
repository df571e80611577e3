//! Cart line-items and the stock records they are validated against.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// Descriptive product fields as returned by `GET /products/{id}`.
///
/// The cart never interprets these beyond the display accessors below; every
/// field is kept in its original order and passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDetails(Map<String, Value>);

impl ProductDetails {
    /// Product title, if present and a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Image URL, if present and a string.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.0.get("image").and_then(Value::as_str)
    }

    /// Unit price. Accepts a JSON number or a numeric string.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match self.0.get("price")? {
            Value::Number(n) => {
                let raw = n.to_string();
                Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .ok()
            }
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    /// Look up an arbitrary field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A cart line-item.
///
/// Serializes flat: `{"id": 1, "title": "...", ..., "amount": 2}`. This is
/// also the persisted form, one object per entry in a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: ProductDetails,
    /// Quantity in the cart. Always at least 1 while the entry exists.
    pub amount: u32,
}

impl Product {
    /// Build a fresh line-item with an amount of 1.
    ///
    /// `id` and `amount` keys inside `details` are dropped so the typed fields
    /// are the only source of truth.
    #[must_use]
    pub fn from_details(id: ProductId, details: ProductDetails) -> Self {
        let mut fields = details.0;
        fields.remove("id");
        fields.remove("amount");

        Self {
            id,
            details: ProductDetails(fields),
            amount: 1,
        }
    }

    /// Unit price multiplied by the amount.
    ///
    /// `None` when the price is missing, unparseable, or the product does not
    /// fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.details
            .price()?
            .checked_mul(Decimal::from(self.amount))
    }
}

/// Maximum purchasable quantity for a product, as reported by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

/// Request to set a line-item's quantity.
///
/// `amount` is signed: zero and negative values are representable and are
/// ignored by the cart rather than rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}
