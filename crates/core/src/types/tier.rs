//! Quantity tiers offered by the product selector.
//!
//! Customers choose a band of units instead of typing a number. Each band has
//! a representative quantity, and that quantity is what pricing uses.

use core::fmt;

use serde::Serialize;

/// One selectable quantity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuantityTier {
    /// Display text of the band, e.g. `251–500 units`.
    pub label: &'static str,
    /// Representative unit count used for pricing.
    pub qty: u32,
}

/// The fixed tier set, smallest first.
pub const QUANTITY_TIERS: [QuantityTier; 5] = [
    QuantityTier {
        label: "1–50 units",
        qty: 25,
    },
    QuantityTier {
        label: "51–100 units",
        qty: 75,
    },
    QuantityTier {
        label: "101–250 units",
        qty: 175,
    },
    QuantityTier {
        label: "251–500 units",
        qty: 375,
    },
    QuantityTier {
        label: "500+ units",
        qty: 500,
    },
];

impl QuantityTier {
    /// The tier the selector starts on.
    #[must_use]
    pub const fn smallest() -> Self {
        QUANTITY_TIERS[0]
    }

    /// Find a tier by its exact label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        QUANTITY_TIERS.iter().copied().find(|t| t.label == label)
    }

    /// Find a tier by its representative quantity.
    #[must_use]
    pub fn from_qty(qty: u32) -> Option<Self> {
        QUANTITY_TIERS.iter().copied().find(|t| t.qty == qty)
    }

    /// Resolve user input that is either a label or a representative quantity.
    ///
    /// Labels are matched with a plain hyphen as well as the en dash, since
    /// that is what people type on a keyboard.
    ///
    /// ```
    /// use pbs_core::QuantityTier;
    ///
    /// assert_eq!(QuantityTier::parse("375").map(|t| t.label), Some("251–500 units"));
    /// assert_eq!(QuantityTier::parse("51-100 units").map(|t| t.qty), Some(75));
    /// assert!(QuantityTier::parse("a lot").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(qty) = input.parse::<u32>() {
            return Self::from_qty(qty);
        }
        Self::from_label(input).or_else(|| Self::from_label(&input.replace('-', "–")))
    }
}

impl fmt::Display for QuantityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ascending() {
        assert!(QUANTITY_TIERS.windows(2).all(|w| match w {
            [a, b] => a.qty < b.qty,
            _ => false,
        }));
    }

    #[test]
    fn test_smallest_tier() {
        assert_eq!(QuantityTier::smallest().qty, 25);
        assert_eq!(QuantityTier::smallest().label, "1–50 units");
    }

    #[test]
    fn test_from_label() {
        let tier = QuantityTier::from_label("101–250 units");
        assert_eq!(tier.map(|t| t.qty), Some(175));
        assert!(QuantityTier::from_label("250 units").is_none());
    }

    #[test]
    fn test_parse_accepts_quantity_and_hyphen() {
        assert_eq!(QuantityTier::parse(" 500 ").map(|t| t.label), Some("500+ units"));
        assert_eq!(QuantityTier::parse("1-50 units").map(|t| t.qty), Some(25));
        assert!(QuantityTier::parse("250").is_none());
    }
}
