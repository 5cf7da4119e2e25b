//! Operations sent to the inventory owner
//!
//! Every operation carries its own oneshot reply channel, so the owner
//! answers each caller exactly once and no state is ever shared.

use crate::store::InventoryState;
use tokio::sync::oneshot;
use tracing::debug;

/// A unit of work for the owner
#[derive(Debug)]
pub(crate) enum Operation {
    /// Set the quantity for a key
    Update {
        key: String,
        value: i64,
        /// Acknowledged once the update has been applied
        applied: oneshot::Sender<()>,
    },

    /// Look up a key
    Read {
        key: String,
        reply: oneshot::Sender<(i64, bool)>,
    },
}

impl Operation {
    /// Build an update and the receiver for its acknowledgement
    pub(crate) fn update(key: impl Into<String>, value: i64) -> (Self, oneshot::Receiver<()>) {
        let (applied, rx) = oneshot::channel();
        let op = Operation::Update {
            key: key.into(),
            value,
            applied,
        };
        (op, rx)
    }

    /// Build a read and the receiver for its result
    pub(crate) fn read(key: impl Into<String>) -> (Self, oneshot::Receiver<(i64, bool)>) {
        let (reply, rx) = oneshot::channel();
        let op = Operation::Read {
            key: key.into(),
            reply,
        };
        (op, rx)
    }

    /// Key the operation targets
    pub(crate) fn key(&self) -> &str {
        match self {
            Operation::Update { key, .. } | Operation::Read { key, .. } => key,
        }
    }

    /// Apply the operation to the state and deliver its reply
    ///
    /// Consumes the operation, so a reply can only ever be sent once.
    pub(crate) fn apply(self, state: &mut InventoryState) {
        match self {
            Operation::Update {
                key,
                value,
                applied,
            } => {
                state.set(key, value);
                if applied.send(()).is_err() {
                    debug!("Update caller went away before the acknowledgement");
                }
            }
            Operation::Read { key, reply } => {
                let result = state.get(&key);
                if reply.send(result).is_err() {
                    debug!("Read caller for '{}' went away before the reply", key);
                }
            }
        }
    }
}
