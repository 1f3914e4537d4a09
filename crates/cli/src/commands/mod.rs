//! Command implementations.
//!
//! Every command opens the same cart record the storefront server uses
//! (`PBS_DATA_DIR`/`PBS_CART_KEY`) and rehydrates it fresh, so it sees the
//! server's last write. A running server only reads the record at startup:
//! edits made here reach it on its next launch, and its next mutation
//! overwrites them. Use the CLI while the server is stopped.

pub mod cart;
pub mod checkout;
pub mod products;

use std::sync::Arc;

use pbs_storefront::cart::{CartError, CartStore, FilePersistence};
use pbs_storefront::catalog::{Catalog, CatalogError};
use pbs_storefront::checkout::SubmissionError;
use pbs_storefront::config::{ConfigError, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded or the selection is invalid.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order was not placed.
    #[error(transparent)]
    Checkout(#[from] SubmissionError),

    /// Quantity tier not recognised.
    #[error("Unknown quantity tier: {0}. Use a label like \"251-500 units\" or a quantity like 375")]
    UnknownTier(String),
}

/// Everything a command works on.
pub struct Workspace {
    pub config: StorefrontConfig,
    pub catalog: Catalog,
    pub cart: CartStore,
}

impl Workspace {
    /// Load configuration and the catalog, and rehydrate the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the catalog cannot be
    /// loaded.
    pub fn open() -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::seed()?,
        };
        let persistence = FilePersistence::new(&config.data_dir, &config.cart_key);
        tracing::debug!(path = %persistence.path().display(), "Opening cart");
        let cart = CartStore::open(Arc::new(persistence));

        Ok(Self {
            config,
            catalog,
            cart,
        })
    }
}
