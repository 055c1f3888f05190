//! Cart Persistence
//!
//! The cart's item list is mirrored into a durable, named local slot so it
//! survives process restarts. The snapshot is the JSON-encoded item list
//! with no schema version: an incompatible stored shape is treated as
//! unparseable and discarded.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{cart::Cart, items::LineItem, notify::Notifier};

/// Default name of the slot holding the cart snapshot.
pub const CART_SLOT: &str = "cart";

/// Errors raised while writing a snapshot.
///
/// Read-side failures never surface here: absent, unreadable or corrupt
/// snapshots are logged and treated as "no saved cart".
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The slot could not be accessed.
    #[error("failed to access snapshot slot: {0}")]
    Io(#[from] io::Error),

    /// The item list could not be encoded.
    #[error("failed to encode cart snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A durable local key-value slot.
///
/// The storefront needs exactly one semantic: read the payload stored under
/// a name, or overwrite it wholesale. Browser local storage, a file on
/// disk, and an in-memory map all satisfy it.
pub trait SnapshotSlot {
    /// Read the raw payload stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Overwrite the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the payload cannot be written.
    fn write(&mut self, key: &str, payload: &str) -> Result<(), SnapshotError>;
}

/// Slot backed by one file per key inside a base directory.
#[derive(Debug, Clone)]
pub struct DirSnapshotSlot {
    base: PathBuf,
}

impl DirSnapshotSlot {
    /// Create a slot rooted at `base`. The directory is created on first
    /// write.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        DirSnapshotSlot { base: base.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    /// The directory holding the slot files.
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl SnapshotSlot for DirSnapshotSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotError::Io(err)),
        }
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.base)?;
        fs::write(self.path_for(key), payload)?;
        Ok(())
    }
}

/// In-memory slot for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotSlot {
    entries: FxHashMap<String, String>,
}

impl MemorySnapshotSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        MemorySnapshotSlot::default()
    }
}

impl SnapshotSlot for MemorySnapshotSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<(), SnapshotError> {
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Bridge keeping a cart's item list in sync with a snapshot slot.
///
/// Call [`CartSnapshots::hydrate`] once at startup and
/// [`CartSnapshots::persist`] after every item-list change. Derived totals
/// are never persisted; they are recomputed from the items on load.
#[derive(Debug, Clone)]
pub struct CartSnapshots<S> {
    slot: S,
    key: String,
}

impl<S: SnapshotSlot> CartSnapshots<S> {
    /// Create a bridge over `slot` using the default [`CART_SLOT`] name.
    pub fn new(slot: S) -> Self {
        CartSnapshots::with_key(slot, CART_SLOT)
    }

    /// Create a bridge using a custom slot name (e.g. a brand-prefixed key).
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        CartSnapshots {
            slot,
            key: key.into(),
        }
    }

    /// Load the persisted item list.
    ///
    /// Absence, read failures and parse failures all yield an empty list:
    /// a broken snapshot must never break startup. The condition is logged.
    pub fn load(&self) -> Vec<LineItem> {
        let payload = match self.slot.read(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key = %self.key, %err, "failed to read cart snapshot; starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&payload) {
            Ok(items) => items,
            Err(err) => {
                warn!(key = %self.key, %err, "discarding unparseable cart snapshot");
                Vec::new()
            }
        }
    }

    /// Serialize `items` and overwrite the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if encoding or writing fails.
    pub fn save(&mut self, items: &[LineItem]) -> Result<(), SnapshotError> {
        let payload = serde_json::to_string(items)?;

        self.slot.write(&self.key, &payload)?;
        debug!(key = %self.key, lines = items.len(), "cart snapshot written");

        Ok(())
    }

    /// Hydrate `cart` from the persisted snapshot, if one parses.
    pub fn hydrate<N: Notifier>(&self, cart: &mut Cart<N>) {
        cart.load(self.load());
    }

    /// Persist the cart's current item list.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if encoding or writing fails.
    pub fn persist<N: Notifier>(&mut self, cart: &Cart<N>) -> Result<(), SnapshotError> {
        self.save(cart.items())
    }
}
