//! Actor store
//!
//! The inventory is owned by a single thread running its own current-thread
//! runtime. Callers never touch the map: they send an operation through a
//! bounded queue and wait on the operation's reply channel. No lock exists.
//!
//! # Liveness
//!
//! Once the owner's cancellation token fires, the owner stops and discards
//! whatever is still queued. The [`InventoryStore`] methods then never
//! complete: do not issue operations after cancelling. Callers that need to
//! observe termination instead use [`ActorStore::try_update`] and
//! [`ActorStore::try_read`].

mod operation;
mod owner;

use crate::config::StoreConfig;
use crate::store::{InventoryState, InventoryStore, StoreError};
use anyhow::Context;
use async_trait::async_trait;
use operation::Operation;
use owner::Owner;
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Handle to an inventory owned by a dedicated thread
///
/// Cloning the handle is cheap; every clone talks to the same owner.
#[derive(Clone)]
pub struct ActorStore {
    /// Inbound queue of the owner
    inbox: mpsc::Sender<Operation>,
}

impl ActorStore {
    /// Start the owner thread
    ///
    /// The owner runs until `token` is cancelled or every handle is dropped.
    pub fn spawn(token: CancellationToken, config: &StoreConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(config.queue_capacity > 0, "queue_capacity must be > 0");

        let (inbox, inbox_rx) = mpsc::channel(config.queue_capacity);
        let owner = Owner::new(
            InventoryState::with_capacity(config.initial_capacity),
            inbox_rx,
            token,
        );

        // The runtime is built and dropped on the owner thread; only the
        // build result crosses back
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);

        std::thread::Builder::new()
            .name("inventory-owner".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                runtime.block_on(owner.run());
            })
            .context("Failed to spawn owner thread")?;

        ready_rx
            .recv()
            .context("Owner thread exited before starting")?
            .context("Failed to create owner runtime")?;

        info!(
            "Actor store started (queue capacity {})",
            config.queue_capacity
        );

        Ok(ActorStore { inbox })
    }

    /// Set a quantity, or report that the owner has terminated
    ///
    /// Returns once the owner has applied the update.
    pub async fn try_update(&self, key: &str, value: i64) -> Result<(), StoreError> {
        let (op, applied) = Operation::update(key, value);
        self.submit(op).await?;
        applied.await.map_err(|_| StoreError::Terminated)
    }

    /// Look up a key, or report that the owner has terminated
    pub async fn try_read(&self, key: &str) -> Result<(i64, bool), StoreError> {
        let (op, reply) = Operation::read(key);
        self.submit(op).await?;
        reply.await.map_err(|_| StoreError::Terminated)
    }

    /// Whether the owner has stopped accepting operations
    ///
    /// Becomes true shortly after cancellation, once the owner has exited.
    pub fn is_terminated(&self) -> bool {
        self.inbox.is_closed()
    }

    /// Enqueue an operation, waiting while the queue is full
    async fn submit(&self, op: Operation) -> Result<(), StoreError> {
        self.inbox
            .send(op)
            .await
            .map_err(|_| StoreError::Terminated)
    }
}

/// Park the caller forever after reporting the fault
///
/// This is the documented behavior of the infallible contract once the owner
/// is gone: the call never completes.
async fn stall<T>(operation: &str, key: &str) -> T {
    error!(
        "{} on '{}' not applied: the inventory owner terminated; the call will never complete",
        operation, key
    );
    std::future::pending().await
}

#[async_trait]
impl InventoryStore for ActorStore {
    async fn update(&self, key: &str, value: i64) {
        if self.try_update(key, value).await.is_err() {
            stall("Update", key).await
        }
    }

    async fn read(&self, key: &str) -> (i64, bool) {
        match self.try_read(key).await {
            Ok(result) => result,
            Err(_) => stall("Read", key).await,
        }
    }

    fn name(&self) -> &'static str {
        "actor"
    }
}
