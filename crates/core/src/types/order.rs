//! Order references and confirmations produced by checkout.

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::contact::{CheckoutDetails, Email};
use super::line_item::CartLineItem;
use super::summary::OrderSummary;

/// Human-facing order number, e.g. `ORD-4821`.
///
/// Purely cosmetic: four random digits, not guaranteed unique and not a key
/// into any system of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Prefix of every reference.
    pub const PREFIX: &'static str = "ORD-";

    /// Generate a reference with a random number in `1000..=9999`.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_number(rand::rng().random_range(1000..=9999))
    }

    /// Build a reference from a known number.
    #[must_use]
    pub fn from_number(number: u16) -> Self {
        Self(format!("{}{number}", Self::PREFIX))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happens after an order is received, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    OrderReceived,
    DesignReview,
    Production,
    Shipping,
}

impl NextStep {
    /// All steps, first to last.
    pub const ALL: [Self; 4] = [
        Self::OrderReceived,
        Self::DesignReview,
        Self::Production,
        Self::Shipping,
    ];

    /// Step title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrderReceived => "Order Received",
            Self::DesignReview => "Design Review",
            Self::Production => "Production",
            Self::Shipping => "Shipping",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::OrderReceived => "We've got your order",
            Self::DesignReview => "Our team reviews your artwork",
            Self::Production => "Your items are printed & made",
            Self::Shipping => "Delivered to your door",
        }
    }
}

/// Result of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    /// Lines as they were when the order was placed.
    pub items: Vec<CartLineItem>,
    pub summary: OrderSummary,
    pub details: CheckoutDetails,
    /// Validated contact address.
    pub email: Email,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// The step the order is currently at. Always the first one: nothing
    /// advances an order after it is placed.
    #[must_use]
    pub const fn current_step(&self) -> NextStep {
        NextStep::OrderReceived
    }
}
