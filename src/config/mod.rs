//! Configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Which store design the driver exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Actor,
    Locked,
    /// Run the actor then the locked store, for comparison
    #[default]
    Both,
}

impl StoreKind {
    pub fn includes_actor(self) -> bool {
        matches!(self, StoreKind::Actor | StoreKind::Both)
    }

    pub fn includes_locked(self) -> bool {
        matches!(self, StoreKind::Locked | StoreKind::Both)
    }
}

/// Store construction settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,

    /// Bound of the actor's inbound queue. 1 is the closest thing to a
    /// rendezvous: a sender waits until the owner has taken the previous item.
    pub queue_capacity: usize,

    /// Initial capacity of the inventory map
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            kind: StoreKind::default(),
            queue_capacity: 1,
            initial_capacity: 1024,
        }
    }
}

/// Demonstration workload settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Number of concurrent writer (then reader) tasks
    pub workers: usize,

    /// Distinct keys written by each worker
    pub keys_per_worker: usize,

    /// Abandon a workload run that takes longer than this
    pub deadline_ms: Option<u64>,
}

/// Upper bound on the writes of one workload run
pub const MAX_WORKLOAD_WRITES: usize = 10_000_000;

impl DriverConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Total writes of one run, `workers * keys_per_worker`
    ///
    /// Fails on an empty workload or one above [`MAX_WORKLOAD_WRITES`].
    pub fn total_writes(&self) -> anyhow::Result<usize> {
        anyhow::ensure!(self.workers > 0, "driver.workers must be > 0");
        anyhow::ensure!(self.keys_per_worker > 0, "driver.keys_per_worker must be > 0");

        match self.workers.checked_mul(self.keys_per_worker) {
            Some(writes) if writes <= MAX_WORKLOAD_WRITES => Ok(writes),
            _ => anyhow::bail!(
                "driver.workers * driver.keys_per_worker must be <= {}",
                MAX_WORKLOAD_WRITES
            ),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        // One worker per CPU core, min 1, max 16
        DriverConfig {
            workers: num_cpus::get().clamp(1, 16),
            keys_per_worker: 10,
            deadline_ms: None,
        }
    }
}

/// Log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is not set
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub driver: DriverConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        Self::from_json(&raw)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(raw).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.store.queue_capacity > 0, "store.queue_capacity must be > 0");
        self.driver.total_writes()?;
        if let Some(deadline_ms) = self.driver.deadline_ms {
            anyhow::ensure!(deadline_ms > 0, "driver.deadline_ms must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();

        assert_eq!(config.store.kind, StoreKind::Both);
        assert_eq!(config.store.queue_capacity, 1);
        assert_eq!(config.store.initial_capacity, 1024);
        assert!((1..=16).contains(&config.driver.workers));
        assert_eq!(config.driver.keys_per_worker, 10);
        assert_eq!(config.driver.deadline(), None);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            r#"{
                "store": { "kind": "actor", "queue_capacity": 64 },
                "driver": { "workers": 3, "deadline_ms": 2500 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.store.kind, StoreKind::Actor);
        assert_eq!(config.store.queue_capacity, 64);
        assert_eq!(config.store.initial_capacity, 1024);
        assert_eq!(config.driver.workers, 3);
        assert_eq!(config.driver.keys_per_worker, 10);
        assert_eq!(config.driver.deadline(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_json(r#"{ "store": { "queue_capacity": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "driver": { "workers": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "driver": { "deadline_ms": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "driver": { "keys_per_worker": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "store": { "kind": "sharded" } }"#).is_err());
    }

    #[test]
    fn test_rejects_oversized_workload() {
        let overflowing = r#"{
            "driver": { "workers": 2, "keys_per_worker": 18446744073709551615, "deadline_ms": 20 }
        }"#;
        let err = Config::from_json(overflowing).unwrap_err();
        assert!(format!("{:#}", err).contains("keys_per_worker"));

        let too_many = format!(
            r#"{{ "driver": {{ "workers": 2, "keys_per_worker": {} }} }}"#,
            MAX_WORKLOAD_WRITES / 2 + 1
        );
        assert!(Config::from_json(&too_many).is_err());

        let at_limit = format!(
            r#"{{ "driver": {{ "workers": 2, "keys_per_worker": {} }} }}"#,
            MAX_WORKLOAD_WRITES / 2
        );
        let config = Config::from_json(&at_limit).unwrap();
        assert_eq!(config.driver.total_writes().unwrap(), MAX_WORKLOAD_WRITES);
    }

    #[test]
    fn test_kind_selection() {
        assert!(StoreKind::Both.includes_actor() && StoreKind::Both.includes_locked());
        assert!(StoreKind::Actor.includes_actor() && !StoreKind::Actor.includes_locked());
        assert!(!StoreKind::Locked.includes_actor() && StoreKind::Locked.includes_locked());
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!("stockroom_config_{}.json", std::process::id()));

        // Clean up if exists
        let _ = std::fs::remove_file(&path);

        let mut written = Config::default();
        written.store.kind = StoreKind::Locked;
        written.store.queue_capacity = 8;
        written.driver.workers = 3;
        written.driver.deadline_ms = Some(750);
        written.log.level = "debug".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&written).unwrap()).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.store.kind, StoreKind::Locked);
        assert_eq!(loaded.store.queue_capacity, 8);
        assert_eq!(loaded.driver.workers, 3);
        assert_eq!(loaded.driver.keys_per_worker, 10);
        assert_eq!(loaded.driver.deadline(), Some(Duration::from_millis(750)));
        assert_eq!(loaded.log.level, "debug");

        // Clean up
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
