//! Stockroom - an in-memory inventory store with two concurrency designs
//!
//! Both designs implement the same [`InventoryStore`] contract:
//! - [`ActorStore`]: a single owner thread holds the map and applies
//!   operations received over a channel, one at a time
//! - [`LockedStore`]: the map is shared behind a reader/writer lock
//!
//! The [`driver`] module runs the same concurrent workload against either one.

pub mod store;
pub mod actor;
pub mod locked;
pub mod config;
pub mod driver;

/// Re-export commonly used types
pub use store::{InventoryState, InventoryStore, StoreError};
pub use actor::ActorStore;
pub use locked::LockedStore;
pub use config::Config;
