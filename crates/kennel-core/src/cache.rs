//! Process-wide breed cache shared by the loader and request handlers.
//!
//! The loader is the only writer. Every update swaps in a complete new
//! [`CacheSnapshot`]; the record list inside a published snapshot is never
//! touched again, so a reader holding one sees a whole page or none of it.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::Breed;

/// Immutable point-in-time view of the cache.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    records: Arc<Vec<Breed>>,
    loading: bool,
    loaded_count: usize,
    last_updated: Option<OffsetDateTime>,
}

impl Default for CacheSnapshot {
    fn default() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            loading: false,
            loaded_count: 0,
            last_updated: None,
        }
    }
}

impl CacheSnapshot {
    pub fn records(&self) -> &Arc<Vec<Breed>> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn is_loading_complete(&self) -> bool {
        !self.loading
    }

    /// Final record count. Only meaningful once loading is complete.
    pub const fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub const fn last_updated(&self) -> Option<OffsetDateTime> {
        self.last_updated
    }

    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            loading: self.loading,
            record_count: self.records.len(),
            loaded_count: self.loaded_count,
            last_updated: self.last_updated,
        }
    }
}

/// Serializable summary of the cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub loading: bool,
    pub record_count: usize,
    pub loaded_count: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
}

/// Shared breed cache.
///
/// Readers call [`BreedCache::snapshot`] and work on the returned value
/// without holding any lock. The write methods are meant for the single
/// background loader.
#[derive(Debug, Default)]
pub struct BreedCache {
    current: RwLock<CacheSnapshot>,
}

impl BreedCache {
    /// Create an empty cache: no records, not loading.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records available right now. Never waits for the loader.
    pub fn records(&self) -> Arc<Vec<Breed>> {
        Arc::clone(self.snapshot().records())
    }

    pub fn is_loading_complete(&self) -> bool {
        self.snapshot().is_loading_complete()
    }

    pub fn status(&self) -> CacheStatus {
        self.snapshot().status()
    }

    /// Mark a load cycle as started.
    ///
    /// Returns `false` when a cycle is already running; only one may be
    /// active at a time.
    pub fn begin_load(&self) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.loading {
            return false;
        }
        *current = CacheSnapshot {
            loading: true,
            loaded_count: 0,
            ..current.clone()
        };
        true
    }

    /// Publish an incremental update while loading.
    pub fn publish(&self, records: Arc<Vec<Breed>>) {
        self.replace(|previous| CacheSnapshot {
            records,
            last_updated: Some(OffsetDateTime::now_utc()),
            ..previous.clone()
        });
    }

    /// Publish the final record list and end the load cycle.
    pub fn complete(&self, records: Arc<Vec<Breed>>) {
        self.replace(|previous| CacheSnapshot {
            loading: false,
            loaded_count: records.len(),
            records,
            ..previous.clone()
        });
    }

    fn replace(&self, next: impl FnOnce(&CacheSnapshot) -> CacheSnapshot) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = next(&current);
    }
}
