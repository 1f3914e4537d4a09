//! Order summary shown on the cart and checkout pages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::CartLineItem;
use super::price::Price;

/// Totals derived from the current cart lines.
///
/// Never stored: call [`summarize`] whenever the lines change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of every line total.
    pub subtotal: Decimal,
    /// Always zero: there is no paid shipping tier.
    pub shipping: Decimal,
    /// `subtotal + shipping`.
    pub total: Decimal,
    /// Number of cart lines (not units).
    pub item_count: usize,
}

impl OrderSummary {
    /// Shipping charged on every order.
    pub const SHIPPING: Decimal = Decimal::ZERO;

    /// Summary of an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            shipping: Self::SHIPPING,
            total: Decimal::ZERO,
            item_count: 0,
        }
    }

    /// Whether the summary describes an empty cart.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Shipping as shown to customers.
    #[must_use]
    pub fn shipping_label(&self) -> String {
        if self.shipping.is_zero() {
            "Free".to_owned()
        } else {
            Price::usd(self.shipping).display()
        }
    }

    /// "1 item" / "3 items".
    #[must_use]
    pub fn item_count_label(&self) -> String {
        if self.item_count == 1 {
            "1 item".to_owned()
        } else {
            format!("{} items", self.item_count)
        }
    }
}

impl Default for OrderSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compute the summary for a set of cart lines.
///
/// Exact decimal sums; no rounding happens here.
///
/// ```
/// use pbs_core::{OrderSummary, summarize};
///
/// assert_eq!(summarize(&[]), OrderSummary::empty());
/// ```
#[must_use]
pub fn summarize(items: &[CartLineItem]) -> OrderSummary {
    let subtotal: Decimal = items.iter().map(|item| item.line_total).sum();
    let shipping = OrderSummary::SHIPPING;

    OrderSummary {
        subtotal,
        shipping,
        total: subtotal + shipping,
        item_count: items.len(),
    }
}
