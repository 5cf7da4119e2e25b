//! The owner loop
//!
//! A single execution unit owns the inventory and applies operations one at a
//! time. It is a two-state machine: `Running` until the cancellation token
//! fires or every handle is dropped, then `Terminated` for good.
//!
//! On termination the inbox is dropped without being drained. Operations still
//! queued are discarded unapplied and their callers are never answered.

use super::operation::Operation;
use crate::store::InventoryState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lifecycle of the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnerState {
    Running,
    Terminated,
}

/// Exclusive owner of an `InventoryState`
pub(crate) struct Owner {
    state: InventoryState,
    inbox: mpsc::Receiver<Operation>,
    token: CancellationToken,
    applied: u64,
}

impl Owner {
    pub(crate) fn new(
        state: InventoryState,
        inbox: mpsc::Receiver<Operation>,
        token: CancellationToken,
    ) -> Self {
        Owner {
            state,
            inbox,
            token,
            applied: 0,
        }
    }

    /// Drive the owner until it terminates
    pub(crate) async fn run(mut self) {
        info!("Inventory owner loop starting");

        let mut phase = OwnerState::Running;
        while phase == OwnerState::Running {
            phase = self.step().await;
        }

        info!(
            "Inventory owner terminated after {} operations ({} keys held)",
            self.applied,
            self.state.len()
        );
    }

    /// Wait for the next input and handle it
    async fn step(&mut self) -> OwnerState {
        tokio::select! {
            // Cancellation takes priority over anything already queued
            biased;

            _ = self.token.cancelled() => {
                info!("Inventory owner cancelled");
                OwnerState::Terminated
            }

            op = self.inbox.recv() => match op {
                Some(op) => {
                    debug!("Inventory owner applying operation on '{}'", op.key());
                    op.apply(&mut self.state);
                    self.applied += 1;
                    OwnerState::Running
                }
                // Every handle dropped, nobody can reach us anymore
                None => {
                    info!("Inventory owner inbox closed");
                    OwnerState::Terminated
                }
            },
        }
    }
}
