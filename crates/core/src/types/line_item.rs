//! Cart line items.
//!
//! A line is a denormalised snapshot of one product selection: the catalog
//! display fields and the unit price are copied in when the line is created,
//! so later catalog edits never change what is already in a cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId};

/// Size key used in line ids for products without size variants.
pub const DEFAULT_SIZE_KEY: &str = "default";

/// Size label stored on lines for products without size variants.
pub const STANDARD_SIZE: &str = "Standard";

/// Reasons a line item is structurally invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The line id is blank.
    #[error("line item id cannot be empty")]
    EmptyId,
    /// The quantity is zero.
    #[error("line item {id} has a quantity of zero")]
    ZeroQuantity {
        /// Offending line.
        id: LineItemId,
    },
    /// The unit price is below zero.
    #[error("line item {id} has a negative unit price ({unit_price})")]
    NegativeUnitPrice {
        /// Offending line.
        id: LineItemId,
        /// Price that was supplied.
        unit_price: Decimal,
    },
    /// `line_total` is not `unit_price * qty`.
    #[error("line item {id} total {actual} does not equal unit price x qty ({expected})")]
    LineTotalMismatch {
        /// Offending line.
        id: LineItemId,
        /// `unit_price * qty`.
        expected: Decimal,
        /// Total that was supplied.
        actual: Decimal,
    },
    /// `unit_price * qty` does not fit in a decimal.
    #[error("line item {id} total overflows")]
    Overflow {
        /// Offending line.
        id: LineItemId,
    },
}

/// One product + size + quantity tier selection in the cart.
///
/// ## Invariant
///
/// `line_total == unit_price * qty`. Lines built with [`NewLineItem`] satisfy
/// it by construction; [`CartLineItem::validate`] checks lines from any other
/// source (deserialised records, hand-built values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// `"{product_id}-{size}"`, unique within a cart.
    pub id: LineItemId,
    /// Catalog product this line was created from.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Product category at add time.
    pub category: String,
    /// Selected size, or [`STANDARD_SIZE`].
    pub size: String,
    /// Quantity tier text, e.g. `251–500 units`.
    pub qty_label: String,
    /// Representative unit count of the tier.
    pub qty: u32,
    /// Price per unit at add time.
    pub unit_price: Decimal,
    /// `unit_price * qty`.
    pub line_total: Decimal,
}

impl CartLineItem {
    /// Check the structural invariants of this line.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: blank id, zero quantity, negative unit
    /// price, or a `line_total` that is not exactly `unit_price * qty`.
    pub fn validate(&self) -> Result<(), LineItemError> {
        if self.id.as_str().trim().is_empty() {
            return Err(LineItemError::EmptyId);
        }
        if self.qty == 0 {
            return Err(LineItemError::ZeroQuantity {
                id: self.id.clone(),
            });
        }
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(LineItemError::NegativeUnitPrice {
                id: self.id.clone(),
                unit_price: self.unit_price,
            });
        }

        let expected = line_total(&self.id, self.unit_price, self.qty)?;
        if expected != self.line_total {
            return Err(LineItemError::LineTotalMismatch {
                id: self.id.clone(),
                expected,
                actual: self.line_total,
            });
        }
        Ok(())
    }

    /// Whether the line carries a real size variant (not [`STANDARD_SIZE`]).
    #[must_use]
    pub fn is_sized(&self) -> bool {
        !self.size.is_empty() && self.size != STANDARD_SIZE
    }
}

/// Parameters for building a [`CartLineItem`].
///
/// The id, size sentinel and line total are derived, so a line built from
/// this struct always satisfies the line-total invariant.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    /// Catalog product.
    pub product_id: ProductId,
    /// Product name snapshot.
    pub name: String,
    /// Product category snapshot.
    pub category: String,
    /// Selected size, `None` for unsized products.
    pub size: Option<String>,
    /// Quantity tier text.
    pub qty_label: String,
    /// Representative unit count.
    pub qty: u32,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl TryFrom<NewLineItem> for CartLineItem {
    type Error = LineItemError;

    fn try_from(new: NewLineItem) -> Result<Self, Self::Error> {
        let size = new.size.filter(|s| !s.is_empty());
        let id = LineItemId::for_selection(new.product_id, size.as_deref());
        let line_total = line_total(&id, new.unit_price, new.qty)?;

        let item = Self {
            id,
            product_id: new.product_id,
            name: new.name,
            category: new.category,
            size: size.unwrap_or_else(|| STANDARD_SIZE.to_owned()),
            qty_label: new.qty_label,
            qty: new.qty,
            unit_price: new.unit_price,
            line_total,
        };
        item.validate()?;
        Ok(item)
    }
}

fn line_total(id: &LineItemId, unit_price: Decimal, qty: u32) -> Result<Decimal, LineItemError> {
    unit_price
        .checked_mul(Decimal::from(qty))
        .ok_or_else(|| LineItemError::Overflow { id: id.clone() })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cups(qty: u32, cents: i64) -> NewLineItem {
        NewLineItem {
            product_id: ProductId::new(7),
            name: "Custom Paper Cups".to_owned(),
            category: "cups".to_owned(),
            size: Some("12oz".to_owned()),
            qty_label: format!("{qty} units"),
            qty,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_new_line_computes_id_and_total() {
        let item = CartLineItem::try_from(cups(500, 248)).unwrap();
        assert_eq!(item.id.as_str(), "7-12oz");
        assert_eq!(item.size, "12oz");
        assert_eq!(item.line_total, Decimal::new(124_000, 2));
        assert!(item.is_sized());
    }

    #[test]
    fn test_unsized_line_uses_sentinels() {
        let mut new = cups(100, 150);
        new.product_id = ProductId::new(3);
        new.size = None;

        let item = CartLineItem::try_from(new).unwrap();
        assert_eq!(item.id.as_str(), "3-default");
        assert_eq!(item.size, STANDARD_SIZE);
        assert!(!item.is_sized());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = CartLineItem::try_from(cups(0, 248)).unwrap_err();
        assert!(matches!(err, LineItemError::ZeroQuantity { .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = CartLineItem::try_from(cups(25, -1)).unwrap_err();
        assert!(matches!(err, LineItemError::NegativeUnitPrice { .. }));
    }

    #[test]
    fn test_free_line_is_valid() {
        let item = CartLineItem::try_from(cups(25, 0)).unwrap();
        assert!(item.line_total.is_zero());
    }

    #[test]
    fn test_validate_detects_tampered_total() {
        let mut item = CartLineItem::try_from(cups(500, 248)).unwrap();
        item.line_total = Decimal::new(173_000, 2);

        let err = item.validate().unwrap_err();
        assert_eq!(
            err,
            LineItemError::LineTotalMismatch {
                id: LineItemId::new("7-12oz"),
                expected: Decimal::new(124_000, 2),
                actual: Decimal::new(173_000, 2),
            }
        );
    }

    #[test]
    fn test_validate_ignores_trailing_zero_scale() {
        let mut item = CartLineItem::try_from(cups(500, 248)).unwrap();
        item.line_total = Decimal::new(1_240_000, 3);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_blank_id_rejected() {
        let mut item = CartLineItem::try_from(cups(25, 100)).unwrap();
        item.id = LineItemId::new("  ");
        assert_eq!(item.validate().unwrap_err(), LineItemError::EmptyId);
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let item = CartLineItem::try_from(cups(500, 248)).unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["id"], "7-12oz");
        assert_eq!(json["productId"], 7);
        assert_eq!(json["qtyLabel"], "500 units");
        assert_eq!(json["unitPrice"], "2.48");
        assert_eq!(json["lineTotal"], "1240.00");
    }

    #[test]
    fn test_deserializes_numeric_prices_and_ignores_unknown_fields() {
        let json = r#"{
            "id": "7-12oz", "productId": 7, "name": "Cups", "category": "cups",
            "size": "12oz", "qtyLabel": "251–500 units", "qty": 375,
            "unitPrice": 2.48, "lineTotal": 930, "image": "cup.png"
        }"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit_price, Decimal::new(248, 2));
        assert!(item.validate().is_ok());
    }
}
