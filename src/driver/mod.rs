//! Demonstration driver
//!
//! Hammers a store with concurrent writers, then concurrent readers, and
//! reports whether every write came back intact. Runs against either design
//! so the two can be compared side by side.

use crate::actor::ActorStore;
use crate::config::{Config, DriverConfig};
use crate::locked::LockedStore;
use crate::store::InventoryStore;
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Outcome of one workload run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadReport {
    pub store: String,
    pub workers: usize,
    pub writes: usize,
    pub correct: usize,
    pub missing: usize,
    pub mismatched: usize,
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

impl WorkloadReport {
    /// Every write was read back with its own value
    pub fn is_consistent(&self) -> bool {
        !self.timed_out && self.correct == self.writes && self.missing == 0 && self.mismatched == 0
    }
}

#[derive(Debug, Default)]
struct Tally {
    correct: usize,
    missing: usize,
    mismatched: usize,
}

fn item_key(worker: usize, item: usize) -> String {
    format!("w{}-item{}", worker, item)
}

/// Quantity unique to each (worker, item) pair
///
/// `worker * keys_per_worker + item` stays below the workload's write count,
/// which `DriverConfig::total_writes` bounds.
fn item_quantity(worker: usize, item: usize, keys_per_worker: usize) -> i64 {
    (worker * keys_per_worker + item) as i64
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

/// Write every worker's keys concurrently, then read them all back concurrently
pub async fn run_workload<S>(store: Arc<S>, config: &DriverConfig) -> anyhow::Result<WorkloadReport>
where
    S: InventoryStore + 'static,
{
    let writes = config.total_writes()?;
    let started = Instant::now();
    let keys = config.keys_per_worker;

    let mut writers = JoinSet::new();
    for worker in 0..config.workers {
        let store = store.clone();
        writers.spawn(async move {
            for item in 0..keys {
                store.update(&item_key(worker, item), item_quantity(worker, item, keys)).await;
            }
        });
    }
    while let Some(joined) = writers.join_next().await {
        joined.context("Writer task failed")?;
    }

    let mut readers = JoinSet::new();
    for worker in 0..config.workers {
        let store = store.clone();
        readers.spawn(async move {
            let mut tally = Tally::default();
            for item in 0..keys {
                match store.read(&item_key(worker, item)).await {
                    (value, true) if value == item_quantity(worker, item, keys) => tally.correct += 1,
                    (_, true) => tally.mismatched += 1,
                    (_, false) => tally.missing += 1,
                }
            }
            tally
        });
    }

    let mut report = WorkloadReport {
        store: store.name().to_string(),
        workers: config.workers,
        writes,
        ..WorkloadReport::default()
    };
    while let Some(joined) = readers.join_next().await {
        let tally = joined.context("Reader task failed")?;
        report.correct += tally.correct;
        report.missing += tally.missing;
        report.mismatched += tally.mismatched;
    }

    report.elapsed_ms = elapsed_ms(started);
    Ok(report)
}

/// Run the workload, abandoning it if the configured deadline elapses
///
/// Dropping the workload aborts its writer and reader tasks.
pub async fn run_with_deadline<S>(
    store: Arc<S>,
    config: &DriverConfig,
) -> anyhow::Result<WorkloadReport>
where
    S: InventoryStore + 'static,
{
    let writes = config.total_writes()?;
    let Some(deadline) = config.deadline() else {
        return run_workload(store, config).await;
    };

    let started = Instant::now();
    let name = store.name();
    match tokio::time::timeout(deadline, run_workload(store, config)).await {
        Ok(report) => report,
        Err(_) => {
            warn!("{} store workload exceeded its {:?} deadline", name, deadline);
            Ok(WorkloadReport {
                store: name.to_string(),
                workers: config.workers,
                writes,
                elapsed_ms: elapsed_ms(started),
                timed_out: true,
                ..WorkloadReport::default()
            })
        }
    }
}

fn log_report(report: &WorkloadReport) {
    info!(
        "{} store: {}/{} writes read back ({} missing, {} mismatched) in {} ms{}",
        report.store,
        report.correct,
        report.writes,
        report.missing,
        report.mismatched,
        report.elapsed_ms,
        if report.timed_out { " [timed out]" } else { "" }
    );
}

/// Run the configured comparison
///
/// The actor's owner runs under a child of `token` and is cancelled as soon as
/// its workload ends, so no operation is ever issued after its teardown.
pub async fn run(config: &Config, token: CancellationToken) -> anyhow::Result<Vec<WorkloadReport>> {
    let mut reports = Vec::new();

    if config.store.kind.includes_actor() {
        let owner_token = token.child_token();
        let store = Arc::new(ActorStore::spawn(owner_token.clone(), &config.store)?);
        let report = run_with_deadline(store, &config.driver).await;
        owner_token.cancel();
        reports.push(report?);
    }

    if config.store.kind.includes_locked() {
        let store = Arc::new(LockedStore::with_capacity(config.store.initial_capacity));
        reports.push(run_with_deadline(store, &config.driver).await?);
    }

    for report in &reports {
        log_report(report);
    }

    Ok(reports)
}
