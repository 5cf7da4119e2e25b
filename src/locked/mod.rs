//! Locked store
//!
//! The inventory is shared directly and guarded by a reader/writer lock.
//! Reads run in parallel, an update excludes everyone else. Guards are scoped
//! to the single map access, so the lock is released on every exit path,
//! unwinding included.

use crate::store::{InventoryState, InventoryStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Inventory behind a reader/writer lock
///
/// No background task exists, so there is nothing to tear down: the store
/// lives as long as its last reference.
pub struct LockedStore {
    inventory: RwLock<InventoryState>,
}

impl LockedStore {
    /// Create an empty store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create an empty store with the specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        LockedStore {
            inventory: RwLock::new(InventoryState::with_capacity(capacity)),
        }
    }
}

impl Default for LockedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for LockedStore {
    async fn update(&self, key: &str, value: i64) {
        let mut inventory = self.inventory.write().await;
        inventory.set(key, value);
    }

    async fn read(&self, key: &str) -> (i64, bool) {
        let inventory = self.inventory.read().await;
        inventory.get(key)
    }

    fn name(&self) -> &'static str {
        "locked"
    }
}
