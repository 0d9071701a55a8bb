//! Response cache for read endpoints
//!
//! Stale-time keyed cache: reads serve an entry younger than the caller's
//! stale window, mutations invalidate or prime entries. Failures never
//! populate the cache, so a miss always falls through to the network.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
pub(crate) struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    inserted_at: Instant,
    value: Value,
}

impl QueryCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The value under `key`, if it is younger than `stale_after`.
    pub(crate) fn get_fresh<T: DeserializeOwned>(
        &self,
        key: &str,
        stale_after: Duration,
    ) -> Option<T> {
        let entries = self.entries.lock().expect("query cache lock poisoned");
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= stale_after {
            return None;
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(_) => None,
        }
    }

    pub(crate) fn put<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let mut entries = self.entries.lock().expect("query cache lock poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    pub(crate) fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("query cache lock poisoned");
        entries.remove(key);
    }

    /// Drop every entry whose key starts with `prefix`.
    pub(crate) fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().expect("query cache lock poisoned");
        entries.retain(|key, _| !key.starts_with(prefix));
    }
}
