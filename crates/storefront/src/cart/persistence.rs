//! Durable storage for the cart.
//!
//! The whole item list is written as one record after every mutation and read
//! once when the store opens. The record layout is
//!
//! ```json
//! {"state":{"items":[ ... ]},"version":0}
//! ```
//!
//! Unknown fields anywhere in the record are ignored, so records written by
//! newer or older builds still load. Amounts may be strings or JSON numbers;
//! a `lineTotal` written as a binary float (`28.749999999999996` for
//! `1.15 x 25`) is snapped back to `unitPrice x qty` when it is off by less
//! than half a cent. Larger mismatches make the record corrupt.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use pbs_core::{CartLineItem, LineItemError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default storage key of the cart record.
pub const DEFAULT_CART_KEY: &str = "pbs-cart";

/// Record layout version written by this build.
pub const RECORD_VERSION: u32 = 0;

/// Largest stored `lineTotal` error treated as float drift: half a cent.
const FLOAT_DRIFT: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Errors reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The stored record is unreadable or structurally invalid.
    #[error("persisted cart is corrupt: {0}")]
    Corrupt(String),

    /// Storage refused the operation (quota, read-only medium).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Where the cart store keeps its record.
///
/// Implementations must write the record atomically: a reader never sees a
/// half-written cart.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the stored items. A missing record is an empty cart, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the record exists but cannot be
    /// used, or an I/O error if it cannot be read.
    fn load(&self) -> Result<Vec<CartLineItem>, PersistenceError>;

    /// Replace the stored record with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, items: &[CartLineItem]) -> Result<(), PersistenceError>;
}

#[derive(Serialize)]
struct RecordRef<'a> {
    state: StateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct StateRef<'a> {
    items: &'a [CartLineItem],
}

#[derive(Deserialize)]
struct Record {
    state: State,
}

#[derive(Deserialize)]
struct State {
    #[serde(default)]
    items: Vec<CartLineItem>,
}

/// Encode items into the record layout.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if serialization fails.
pub fn encode(items: &[CartLineItem]) -> Result<String, PersistenceError> {
    let record = RecordRef {
        state: StateRef { items },
        version: RECORD_VERSION,
    };
    Ok(serde_json::to_string(&record)?)
}

/// Decode a record, rejecting anything the store could not have written.
///
/// Every line must satisfy its invariants and ids must be unique; a record
/// that breaks either rule is treated as corrupt as a whole. Line totals
/// within [`FLOAT_DRIFT`] of `unit_price * qty` are recomputed first.
///
/// # Errors
///
/// Returns [`PersistenceError::Corrupt`] describing the first problem found.
pub fn decode(text: &str) -> Result<Vec<CartLineItem>, PersistenceError> {
    let record: Record =
        serde_json::from_str(text).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    let mut items = record.state.items;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &mut items {
        match item.validate() {
            Err(LineItemError::LineTotalMismatch {
                expected, actual, ..
            }) if (expected - actual).abs() < FLOAT_DRIFT => {
                debug!(id = %item.id, %actual, %expected, "Recomputed drifted line total");
                item.line_total = expected;
            }
            result => result.map_err(|e| PersistenceError::Corrupt(e.to_string()))?,
        }
        if !seen.insert(item.id.clone()) {
            return Err(PersistenceError::Corrupt(format!(
                "duplicate line item id {}",
                item.id
            )));
        }
    }

    Ok(items)
}

/// Stores the cart as a JSON file named after the storage key.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Persist to `<dir>/<key>.json`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for FilePersistence {
    fn load(&self) -> Result<Vec<CartLineItem>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => decode(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        let text = encode(items)?;

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        // Write aside then rename so the record is replaced in one step
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory record, for tests and for running without durable storage.
///
/// Counts saves and can be told to fail writes, which is how the store's
/// "persistence failure does not lose the mutation" rule is exercised.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    record: Mutex<Option<String>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryPersistence {
    /// Start with no stored record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw stored record (which may be corrupt).
    #[must_use]
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The stored record, if any.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceAdapter for MemoryPersistence {
    fn load(&self) -> Result<Vec<CartLineItem>, PersistenceError> {
        self.record().map_or_else(|| Ok(Vec::new()), |text| decode(&text))
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("quota exceeded".to_owned()));
        }

        let text = encode(items)?;
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(text);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
