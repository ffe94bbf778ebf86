//! Local persistence for favorites, shopping list and search history.
//!
//! # Slots
//!
//! | slot | key |
//! | --- | --- |
//! | favorites | `ecofeira_favorites` |
//! | shopping list | `ecofeira_shopping_list` |
//! | recent searches | `ecofeira_recent_searches` |
//! | scanned codes | `ecofeira_scanned_history` |
//!
//! Each slot holds one JSON document. Reads fail soft: a missing or malformed
//! value is the empty default. Writes happen synchronously after every
//! mutation; favorites and shopping-list writes are held back until the
//! initial load has completed so empty start-up values never overwrite
//! what is on disk.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use ecofeira_core::{ProductId, ShoppingListItem};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The four persisted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Favorites,
    ShoppingList,
    RecentSearches,
    ScannedHistory,
}

impl Slot {
    /// Storage key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Favorites => "ecofeira_favorites",
            Self::ShoppingList => "ecofeira_shopping_list",
            Self::RecentSearches => "ecofeira_recent_searches",
            Self::ScannedHistory => "ecofeira_scanned_history",
        }
    }

    /// Whether writes wait for the initial load.
    #[must_use]
    pub const fn waits_for_load(self) -> bool {
        matches!(self, Self::Favorites | Self::ShoppingList)
    }
}

/// Everything read from storage at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub favorites: Vec<ProductId>,
    pub shopping_list: Vec<ShoppingListItem>,
    pub recent_searches: Vec<String>,
    pub scanned_history: Vec<String>,
}

/// Typed access to the slots over any [`KeyValueStore`].
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    loaded: bool,
}

impl Persistence {
    /// Wrap a backend. Gated slots are not written until [`Self::mark_loaded`].
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            loaded: false,
        }
    }

    /// Allow gated slots to be written.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Whether the initial load has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read all four slots.
    #[must_use]
    pub fn load(&self) -> PersistedState {
        PersistedState {
            favorites: self.read(Slot::Favorites),
            shopping_list: self.read(Slot::ShoppingList),
            recent_searches: self.read(Slot::RecentSearches),
            scanned_history: self.read(Slot::ScannedHistory),
        }
    }

    /// Read one slot; absent, unreadable or malformed values give the default.
    #[must_use]
    pub fn read<T: DeserializeOwned + Default>(&self, slot: Slot) -> T {
        let raw = match self.store.get(slot.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key = slot.key(), error = %e, "Failed to read slot, using empty value");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = slot.key(), error = %e, "Malformed slot value, using empty value");
            T::default()
        })
    }

    /// Write one slot, honoring the load gate. Returns whether it was written.
    pub fn write<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> bool {
        if slot.waits_for_load() && !self.loaded {
            debug!(key = slot.key(), "Skipping write before initial load");
            return false;
        }
        self.write_now(slot, value)
    }

    /// Write one slot immediately, ignoring the load gate (explicit clears).
    /// Failures are logged and swallowed.
    pub fn write_now<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(slot.key(), &json));

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key = slot.key(), error = %e, "Failed to write slot");
                false
            }
        }
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
