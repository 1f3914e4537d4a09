//! Integration tests for the PBS storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pbs-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenario` - Cart store and pricing end to end
//! - `cart_persistence` - Rehydration from the on-disk record
//! - `storefront_api` - HTTP routes, driven in-process
//!
//! Shared fixtures live here so every test file builds carts the same way.

use std::sync::Arc;
use std::time::Duration;

use pbs_core::{CartLineItem, CheckoutDetails, NewLineItem, ProductId};
use pbs_storefront::cart::{CartStore, MemoryPersistence, PersistenceAdapter};
use pbs_storefront::catalog::Catalog;
use pbs_storefront::checkout::CheckoutSettings;
use pbs_storefront::config::StorefrontConfig;
use pbs_storefront::state::AppState;
use rust_decimal::Decimal;

/// Build a valid line from a product, optional size, quantity and unit price
/// in cents.
///
/// # Panics
///
/// Panics if the line is invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn line(
    product: i32,
    name: &str,
    size: Option<&str>,
    qty: u32,
    unit_cents: i64,
) -> CartLineItem {
    CartLineItem::try_from(NewLineItem {
        product_id: ProductId::new(product),
        name: name.to_owned(),
        category: "test".to_owned(),
        size: size.map(str::to_owned),
        qty_label: format!("{qty} units"),
        qty,
        unit_price: Decimal::new(unit_cents, 2),
    })
    .unwrap()
}

/// A cart backed by in-memory storage.
#[must_use]
pub fn memory_cart() -> (CartStore, Arc<MemoryPersistence>) {
    let storage = Arc::new(MemoryPersistence::new());
    (CartStore::open(storage.clone()), storage)
}

/// Checkout timing short enough for tests.
#[must_use]
pub const fn fast_checkout() -> CheckoutSettings {
    CheckoutSettings {
        delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

/// Application state over the seed catalog and the given storage.
///
/// # Panics
///
/// Panics if the seed catalog is invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn app_state(persistence: Arc<dyn PersistenceAdapter>, checkout: CheckoutSettings) -> AppState {
    let config = StorefrontConfig {
        checkout,
        ..StorefrontConfig::default()
    };
    AppState::with_parts(config, Catalog::seed().unwrap(), persistence)
}

/// A filled-in checkout form.
#[must_use]
pub fn checkout_details() -> CheckoutDetails {
    CheckoutDetails {
        first_name: "Maria".to_owned(),
        last_name: "Lopez".to_owned(),
        email: "maria@example.com".to_owned(),
        phone: Some("512-555-0100".to_owned()),
        company: Some("Lopez Bakery".to_owned()),
        address1: "123 Main Street".to_owned(),
        address2: None,
        city: "Austin".to_owned(),
        state: "TX".to_owned(),
        zip: "78701".to_owned(),
        country: "United States".to_owned(),
        instructions: Some("Logo on both sides".to_owned()),
    }
}
