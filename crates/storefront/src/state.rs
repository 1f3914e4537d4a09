//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};

use pbs_core::CheckoutStatus;

use crate::cart::{CartRepository, CartStore, FilePersistence, PersistenceAdapter};
use crate::catalog::{Catalog, CatalogError};
use crate::checkout::CheckoutFlow;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It is the application root:
/// the one cart store and the current checkout session live here and are
/// handed to handlers by reference.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Arc<CartStore>,
    checkout: Mutex<Arc<CheckoutFlow>>,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Loads the configured catalog (or the embedded seed) and opens the cart
    /// from `<data_dir>/<cart_key>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::seed()?,
        };
        let persistence = Arc::new(FilePersistence::new(&config.data_dir, &config.cart_key));
        Ok(Self::with_parts(config, catalog, persistence))
    }

    /// Create the application state from already-built parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        catalog: Catalog,
        persistence: Arc<dyn PersistenceAdapter>,
    ) -> Self {
        let cart = Arc::new(CartStore::open(persistence));
        let checkout = Mutex::new(Arc::new(CheckoutFlow::new(config.checkout)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// The checkout session as it is now, completed or not.
    #[must_use]
    pub fn current_checkout(&self) -> Arc<CheckoutFlow> {
        Arc::clone(
            &self
                .inner
                .checkout
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// The session a new submission should use. A completed session is
    /// replaced by a fresh one.
    #[must_use]
    pub fn checkout_session(&self) -> Arc<CheckoutFlow> {
        let mut current = self
            .inner
            .checkout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if current.status() == CheckoutStatus::Complete {
            *current = Arc::new(CheckoutFlow::new(self.inner.config.checkout));
        }
        Arc::clone(&current)
    }

    /// Whether cart edits are locked because an order is being placed.
    #[must_use]
    pub fn cart_locked(&self) -> bool {
        self.inner.cart.is_locked()
    }
}
