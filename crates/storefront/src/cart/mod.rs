//! The cart store.
//!
//! [`CartStore`] is the only owner of cart state. It is constructed once by
//! the application root and handed to whatever needs it; there is no global
//! instance. Every mutation is applied in memory first and then written
//! through the injected [`PersistenceAdapter`]. A failed write is logged and
//! otherwise ignored: the in-memory cart stays authoritative for the running
//! process.
//!
//! Readers get snapshots via [`CartRepository::list`] or a live view via
//! [`CartStore::subscribe`], which observes every completed mutation.
//!
//! While an order is being placed the cart is locked: every mutation fails
//! with [`CartError::Locked`] until the checkout either clears the cart or
//! gives the lock back. The lock flag is only read and written under the
//! channel's write lock, so a mutation can never slip in between the
//! checkout's snapshot and its final clear.

pub mod persistence;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pbs_core::{CartLineItem, LineItemError, LineItemId, OrderSummary, summarize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use persistence::{
    DEFAULT_CART_KEY, FilePersistence, MemoryPersistence, PersistenceAdapter, PersistenceError,
};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The line breaks a structural invariant and was not stored.
    #[error("invalid cart line: {0}")]
    InvalidItem(#[from] LineItemError),

    /// An order is being placed from this cart.
    #[error("cart is locked while the order is being placed")]
    Locked,
}

/// Cart operations shared by every cart implementation.
pub trait CartRepository: Send + Sync {
    /// Insert `item`, or replace the line with the same id.
    ///
    /// Replacement swaps the whole line (quantity, price, total), keeping its
    /// position. Quantities are never merged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidItem`] if the line breaks its invariants,
    /// or [`CartError::Locked`] during checkout; the cart is left unchanged.
    fn add(&self, item: CartLineItem) -> Result<(), CartError>;

    /// Remove the line with `id`. Returns whether a line was removed; removing
    /// an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Locked`] during checkout.
    fn remove(&self, id: &LineItemId) -> Result<bool, CartError>;

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Locked`] during checkout.
    fn clear(&self) -> Result<(), CartError>;

    /// Lock the cart for checkout and return the lines being ordered.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Locked`] if another checkout holds the lock.
    fn lock(&self) -> Result<Vec<CartLineItem>, CartError>;

    /// Give the checkout lock back without touching the lines.
    fn unlock(&self);

    /// Empty a locked cart and release the lock in one step.
    fn clear_and_unlock(&self);

    /// Whether a checkout holds the lock.
    fn is_locked(&self) -> bool;

    /// Snapshot of the current lines, in insertion order.
    fn list(&self) -> Vec<CartLineItem>;

    /// Totals for the current lines.
    fn summary(&self) -> OrderSummary {
        summarize(&self.list())
    }
}

/// Cart state backed by a watch channel and a persistence adapter.
pub struct CartStore {
    items: watch::Sender<Vec<CartLineItem>>,
    // Only touched under the channel's write lock
    locked: AtomicBool,
    persistence: Arc<dyn PersistenceAdapter>,
}

impl CartStore {
    /// Open the store, rehydrating from `persistence`.
    ///
    /// A missing record gives an empty cart. A corrupt or unreadable record is
    /// discarded with a warning and also gives an empty cart.
    #[must_use]
    pub fn open(persistence: Arc<dyn PersistenceAdapter>) -> Self {
        let items = match persistence.load() {
            Ok(items) => {
                debug!(count = items.len(), "Rehydrated cart");
                items
            }
            Err(e) => {
                warn!(error = %e, "Discarding persisted cart, starting empty");
                Vec::new()
            }
        };

        let (items, _) = watch::channel(items);
        Self {
            items,
            locked: AtomicBool::new(false),
            persistence,
        }
    }

    /// Observe the cart. The receiver sees the state after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.items.subscribe()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn persist(&self, items: &[CartLineItem]) {
        if let Err(e) = self.persistence.save(items) {
            warn!(error = %e, count = items.len(), "Failed to persist cart");
        }
    }
}

impl CartRepository for CartStore {
    fn add(&self, item: CartLineItem) -> Result<(), CartError> {
        item.validate()?;

        let id = item.id.clone();
        let mut replaced = None;
        // Mutation and write happen under the channel's lock, so concurrent
        // callers cannot persist out of order
        self.items.send_if_modified(|items| {
            if self.locked.load(Ordering::Acquire) {
                return false;
            }
            let found = items.iter_mut().find(|existing| existing.id == item.id);
            replaced = Some(found.is_some());
            match found {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
            self.persist(items);
            true
        });

        let replaced = replaced.ok_or(CartError::Locked)?;
        info!(%id, replaced, "Cart line added");
        Ok(())
    }

    fn remove(&self, id: &LineItemId) -> Result<bool, CartError> {
        let mut locked = false;
        let removed = self.items.send_if_modified(|items| {
            if self.locked.load(Ordering::Acquire) {
                locked = true;
                return false;
            }
            let before = items.len();
            items.retain(|item| &item.id != id);
            let changed = items.len() != before;
            if changed {
                self.persist(items);
            }
            changed
        });

        if locked {
            return Err(CartError::Locked);
        }
        debug!(%id, removed, "Cart line remove");
        Ok(removed)
    }

    fn clear(&self) -> Result<(), CartError> {
        let mut locked = false;
        self.items.send_if_modified(|items| {
            if self.locked.load(Ordering::Acquire) {
                locked = true;
                return false;
            }
            let changed = !items.is_empty();
            items.clear();
            self.persist(items);
            changed
        });

        if locked {
            return Err(CartError::Locked);
        }
        info!("Cart cleared");
        Ok(())
    }

    fn lock(&self) -> Result<Vec<CartLineItem>, CartError> {
        let mut snapshot = None;
        self.items.send_if_modified(|items| {
            if !self.locked.swap(true, Ordering::AcqRel) {
                snapshot = Some(items.clone());
            }
            false
        });

        let items = snapshot.ok_or(CartError::Locked)?;
        debug!(count = items.len(), "Cart locked for checkout");
        Ok(items)
    }

    fn unlock(&self) {
        self.items.send_if_modified(|_| {
            self.locked.store(false, Ordering::Release);
            false
        });
        debug!("Cart unlocked");
    }

    fn clear_and_unlock(&self) {
        self.items.send_if_modified(|items| {
            let changed = !items.is_empty();
            items.clear();
            self.persist(items);
            self.locked.store(false, Ordering::Release);
            changed
        });
        info!("Cart cleared after checkout");
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    fn list(&self) -> Vec<CartLineItem> {
        self.items.borrow().clone()
    }

    fn summary(&self) -> OrderSummary {
        summarize(&self.items.borrow())
    }
}
