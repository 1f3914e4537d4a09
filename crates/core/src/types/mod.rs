//! Core types for the PBS storefront.
//!
//! This module provides type-safe wrappers for the cart and checkout domain.

pub mod contact;
pub mod id;
pub mod line_item;
pub mod order;
pub mod price;
pub mod status;
pub mod summary;
pub mod tier;

pub use contact::{CheckoutDetails, DEFAULT_COUNTRY, DetailsError, Email, EmailError};
pub use id::*;
pub use line_item::{CartLineItem, DEFAULT_SIZE_KEY, LineItemError, NewLineItem, STANDARD_SIZE};
pub use order::{NextStep, OrderConfirmation, OrderReference};
pub use price::{CurrencyCode, Price, format_amount};
pub use status::CheckoutStatus;
pub use summary::{OrderSummary, summarize};
pub use tier::{QUANTITY_TIERS, QuantityTier};
