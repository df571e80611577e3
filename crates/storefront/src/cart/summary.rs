//! Cart totals for display.

use rocketshoes_core::{CurrencyCode, Price, Product};
use rust_decimal::Decimal;

/// Item count and subtotal of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Number of distinct products.
    pub distinct_items: usize,
    /// Sum of all amounts.
    pub item_count: u64,
    /// Sum of `price * amount` over entries with a known price.
    pub subtotal: Decimal,
    /// Entries left out of the subtotal: price missing, unparseable, or too
    /// large to total.
    pub unpriced_items: usize,
}

impl CartSummary {
    /// Summarize a list of line-items.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut summary = Self {
            distinct_items: products.len(),
            item_count: 0,
            subtotal: Decimal::ZERO,
            unpriced_items: 0,
        };

        for product in products {
            summary.item_count += u64::from(product.amount);
            match product
                .line_total()
                .and_then(|total| summary.subtotal.checked_add(total))
            {
                Some(subtotal) => summary.subtotal = subtotal,
                None => summary.unpriced_items += 1,
            }
        }

        summary
    }

    /// Subtotal in the given currency.
    #[must_use]
    pub const fn subtotal_price(&self, currency: CurrencyCode) -> Price {
        Price::new(self.subtotal, currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn products(value: serde_json::Value) -> Vec<Product> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_cart() {
        let summary = CartSummary::from_products(&[]);
        assert_eq!(summary.distinct_items, 0);
        assert_eq!(summary.item_count, 0);
        assert_eq!(
            summary.subtotal_price(CurrencyCode::BRL).to_string(),
            "R$0.00"
        );
    }

    #[test]
    fn test_sums_amounts_and_prices() {
        let summary = CartSummary::from_products(&products(json!([
            {"id": 1, "title": "Shoe", "price": 139.9, "amount": 2},
            {"id": 2, "title": "Boot", "price": "59.90", "amount": 1},
        ])));

        assert_eq!(summary.distinct_items, 2);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Decimal::new(33970, 2));
        assert_eq!(
            summary.subtotal_price(CurrencyCode::USD).to_string(),
            "$339.70"
        );
        assert_eq!(summary.unpriced_items, 0);
    }

    #[test]
    fn test_counts_unpriced_entries() {
        let summary = CartSummary::from_products(&products(json!([
            {"id": 1, "title": "Shoe", "amount": 4},
        ])));

        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.unpriced_items, 1);
    }

    #[test]
    fn test_overflowing_line_is_left_out_of_subtotal() {
        let summary = CartSummary::from_products(&products(json!([
            {"id": 1, "title": "Shoe", "price": "79228162514264337593543950335", "amount": 2},
            {"id": 2, "title": "Boot", "price": "10.00", "amount": 1},
        ])));

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Decimal::new(10, 0));
        assert_eq!(summary.unpriced_items, 1);
    }

    #[test]
    fn test_overflowing_subtotal_is_left_out() {
        let summary = CartSummary::from_products(&products(json!([
            {"id": 1, "title": "Shoe", "price": "79228162514264337593543950335", "amount": 1},
            {"id": 2, "title": "Boot", "price": "79228162514264337593543950335", "amount": 1},
        ])));

        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.unpriced_items, 1);
    }
}
