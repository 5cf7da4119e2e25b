//! Inventory state: the map both store designs protect

use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

/// Type alias for our inventory map with SipHasher
type InventoryMap = HashMap<String, i64, BuildHasherDefault<SipHasher13>>;

/// Mapping from item key to quantity
///
/// This type is not synchronized. It is only ever touched by the actor's
/// owner thread or while holding the locked store's guard in the right mode.
#[derive(Debug)]
pub struct InventoryState {
    items: InventoryMap,
}

impl InventoryState {
    /// Create an empty state with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create an empty state with the specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        InventoryState {
            items: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
        }
    }

    /// Set the quantity for a key, returns true if the key is new
    pub fn set(&mut self, key: impl Into<String>, value: i64) -> bool {
        self.items.insert(key.into(), value).is_none()
    }

    /// Look up a key
    ///
    /// Returns `(quantity, true)` when present and `(0, false)` otherwise.
    pub fn get(&self, key: &str) -> (i64, bool) {
        match self.items.get(key) {
            Some(value) => (*value, true),
            None => (0, false),
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the state holds no keys
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::new()
    }
}
