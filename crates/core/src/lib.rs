//! PBS Core - Shared domain types for the packaging storefront.
//!
//! This crate provides the types used by every PBS component:
//! - `storefront` - Cart store, checkout flow and the JSON API
//! - `cli` - Command-line cart and checkout tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP. Pricing lives here because it is a pure function
//! over cart lines and must give the same answer everywhere it is shown.
//!
//! # Modules
//!
//! - [`types`] - Ids, money, quantity tiers, cart lines, summaries and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
