//! In-process query cache.
//!
//! One flat map keyed by query signature. Entries never expire on their own;
//! any successful write evicts everything, so staleness is bounded by the
//! interval between writes served through this process.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::ports::{CacheKey, CachedValue, DirectoryCache};

/// Process-local [`DirectoryCache`] backed by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryCache {
    entries: RwLock<HashMap<String, CachedValue>>,
}

impl InMemoryDirectoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectoryCache for InMemoryDirectoryCache {
    fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&key.signature()).cloned()
    }

    fn put(&self, key: &CacheKey, value: CachedValue) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(key.signature(), value);
    }

    fn evict_all(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}
