//! Store errors

use thiserror::Error;

/// Errors surfaced by the fallible store operations
///
/// The core `update`/`read` contract never fails. These variants are only
/// returned by the `try_*` methods of the actor store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The owner has stopped and will not apply or answer any more operations
    #[error("inventory owner has terminated")]
    Terminated,
}
