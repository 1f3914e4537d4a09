//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are `rust_decimal::Decimal` so sums over many cart lines never
//! drift. Rounding to two places happens only in [`format_amount`] and
//! [`Price::display`], i.e. at presentation time.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price, the storefront's only selling currency.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display (e.g., "$1,240.00").
    #[must_use]
    pub fn display(&self) -> String {
        let formatted = format_amount(self.amount);
        match formatted.strip_prefix('-') {
            Some(abs) => format!("-{}{abs}", self.currency_code.symbol()),
            None => format!("{}{formatted}", self.currency_code.symbol()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Currency symbol used when formatting amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

/// Format an amount with two decimals and en-US thousands grouping.
///
/// ```
/// use rust_decimal::Decimal;
/// use pbs_core::format_amount;
///
/// assert_eq!(format_amount(Decimal::new(124_000, 2)), "1,240.00");
/// assert_eq!(format_amount(Decimal::new(15, 1)), "1.50");
/// assert_eq!(format_amount(Decimal::ZERO), "0.00");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(Decimal::new(123_456_789, 2)), "1,234,567.89");
        assert_eq!(format_amount(Decimal::new(100_000, 2)), "1,000.00");
        assert_eq!(format_amount(Decimal::new(99_999, 2)), "999.99");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(12_345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::new(12_344, 3)), "12.34");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(Decimal::new(-150_000, 2)), "-1,500.00");
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::usd(Decimal::new(124_000, 2)).display(), "$1,240.00");
        assert_eq!(Price::usd(Decimal::new(-250, 2)).display(), "-$2.50");
        assert_eq!(
            Price::new(Decimal::new(5, 0), CurrencyCode::default()).to_string(),
            "$5.00"
        );
    }

    #[test]
    fn test_currency_code_serializes_as_iso() {
        let json = serde_json::to_string(&Price::usd(Decimal::ONE)).unwrap_or_default();
        assert!(json.contains("\"currency_code\":\"USD\""));
    }
}
