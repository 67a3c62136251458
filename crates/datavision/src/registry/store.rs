//! Concurrency-safe dataset registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use log::info;

use super::dataset::{Dataset, DatasetSummary};
use crate::error::{DataVisionError, Result};

/// Opaque dataset identifier (stringified millisecond timestamp).
pub type DatasetId = String;

/// Process-lifetime store of datasets keyed by id.
///
/// Readers share the lock; `put` and `delete` hold it exclusively for the map
/// mutation only. Lookups hand out `Arc` snapshots so queries run unlocked.
#[derive(Debug, Default)]
pub struct Registry {
    datasets: RwLock<HashMap<DatasetId, Arc<Dataset>>>,
    last_id: AtomicI64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh id from the wall clock.
    ///
    /// Ids are strictly increasing: two calls in the same millisecond get
    /// consecutive values instead of colliding.
    pub fn mint_id(&self) -> DatasetId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1).to_string()
    }

    /// Store a dataset under a freshly minted id.
    ///
    /// Returns the id with the stored snapshot, which stays valid even if the
    /// dataset is deleted right away.
    pub fn insert(&self, dataset: Dataset) -> (DatasetId, Arc<Dataset>) {
        let id = self.mint_id();
        let stored = self.put(id.clone(), dataset);
        (id, stored)
    }

    /// Insert or overwrite the dataset stored under `id`.
    pub fn put(&self, id: impl Into<DatasetId>, dataset: Dataset) -> Arc<Dataset> {
        let id = id.into();
        let dataset = Arc::new(dataset);
        info!(
            "Registering dataset {} ({}, {} rows)",
            id,
            dataset.file_name,
            dataset.row_count()
        );
        self.write().insert(id, Arc::clone(&dataset));
        dataset
    }

    /// Look up a dataset.
    pub fn get(&self, id: &str) -> Result<Arc<Dataset>> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| DataVisionError::NotFound(id.to_string()))
    }

    /// Summaries of every stored dataset, in no particular order.
    pub fn list(&self) -> Vec<DatasetSummary> {
        self.read()
            .iter()
            .map(|(id, dataset)| dataset.summary(id))
            .collect()
    }

    /// Remove a dataset. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            info!("Deleted dataset {}", id);
        }
        removed
    }

    /// Number of stored datasets.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the guard cannot leave the map half-updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<DatasetId, Arc<Dataset>>> {
        self.datasets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<DatasetId, Arc<Dataset>>> {
        self.datasets.write().unwrap_or_else(PoisonError::into_inner)
    }
}
