//! Inventory store contract
//!
//! Both concurrency designs (the single-owner actor and the reader/writer
//! locked map) implement [`InventoryStore`], so callers and tests can swap one
//! for the other without changing a line.

mod error;
mod state;

#[cfg(test)]
pub(crate) mod conformance;

pub use error::StoreError;
pub use state::InventoryState;

use async_trait::async_trait;

/// Key/value inventory shared between concurrent callers
///
/// Implementations guarantee at most one mutator at a time and never let a
/// mutator run concurrently with a reader.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Set the quantity stored under `key`
    async fn update(&self, key: &str, value: i64);

    /// Look up `key`
    ///
    /// Returns `(quantity, true)` if the key was previously updated and
    /// `(0, false)` otherwise. Absence is never an error.
    async fn read(&self, key: &str) -> (i64, bool);

    /// Short name of the design, for logs and reports
    fn name(&self) -> &'static str;
}
