//! Property suite shared by every `InventoryStore` implementation
//!
//! Each implementation's test module calls these with a fresh store.

use super::InventoryStore;
use std::collections::HashSet;
use std::sync::Arc;

pub(crate) async fn update_then_read<S: InventoryStore>(store: &S) {
    store.update("widgets", 42).await;
    assert_eq!(store.read("widgets").await, (42, true));

    store.update("widgets", -7).await;
    assert_eq!(store.read("widgets").await, (-7, true));
}

pub(crate) async fn read_never_written<S: InventoryStore>(store: &S) {
    assert_eq!(store.read("unknown").await, (0, false));

    store.update("bolts", 3).await;
    assert_eq!(store.read("unknown").await, (0, false));
}

pub(crate) async fn zero_quantity_is_found<S: InventoryStore>(store: &S) {
    store.update("nuts", 0).await;
    assert_eq!(store.read("nuts").await, (0, true));
}

/// Ten concurrent writers on "k0".."k9", then ten concurrent readers
pub(crate) async fn concurrent_distinct_keys<S: InventoryStore + 'static>(store: Arc<S>) {
    let writers: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.update(&format!("k{}", i), i).await })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }

    let readers: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { (i, store.read(&format!("k{}", i)).await) })
        })
        .collect();
    for reader in readers {
        let (i, result) = reader.await.unwrap();
        assert_eq!(result, (i, true), "lost write for k{}", i);
    }

    assert_eq!(store.read("k7").await, (7, true));
}

/// Many writers racing on one key leave exactly one of their values
pub(crate) async fn concurrent_same_key<S: InventoryStore + 'static>(store: Arc<S>) {
    let attempted: HashSet<i64> = (1..=32).map(|i| i * 1_000_003).collect();

    let writers: Vec<_> = attempted
        .iter()
        .copied()
        .map(|value| {
            let store = store.clone();
            tokio::spawn(async move { store.update("contested", value).await })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }

    let (value, found) = store.read("contested").await;
    assert!(found);
    assert!(attempted.contains(&value), "unexpected value {}", value);
}

/// Readers interleaved with writers only ever observe a complete write
pub(crate) async fn reads_see_whole_writes<S: InventoryStore + 'static>(store: Arc<S>) {
    store.update("gauge", 0).await;

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for value in 1..=200 {
                store.update("gauge", value * 10).await;
            }
        })
    };

    let mut last_seen = 0;
    for _ in 0..200 {
        let (value, found) = store.read("gauge").await;
        assert!(found);
        assert_eq!(value % 10, 0, "partial write observed: {}", value);
        assert!(value >= last_seen, "went backwards from {} to {}", last_seen, value);
        last_seen = value;
    }

    writer.await.unwrap();
    assert_eq!(store.read("gauge").await, (2000, true));
}
