use std::{collections::HashMap, sync::Arc, time::{Duration, Instant}};

use anyhow::Result;
use log::debug;

/// When a cached dataset must be fetched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep entries until they are invalidated by hand.
    #[default]
    Forever,
    /// Refetch entries older than the given age.
    Ttl(Duration),
}

struct Entry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

/// Values keyed by dataset id, fetched on first use.
pub struct DatasetCache<T> {
    policy: CachePolicy,
    entries: HashMap<String, Entry<T>>,
}

impl<T> DatasetCache<T> {
    pub fn new(policy: CachePolicy) -> Self {
        Self { policy, entries: HashMap::new() }
    }

    #[inline] pub fn policy(&self) -> CachePolicy { self.policy }

    /// Number of stored entries, fresh or not.
    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn is_fresh(&self, entry: &Entry<T>, now: Instant) -> bool {
        match self.policy {
            CachePolicy::Forever => true,
            CachePolicy::Ttl(ttl) => now.saturating_duration_since(entry.fetched_at) < ttl,
        }
    }

    /// Returns true if `dataset` is cached and not expired.
    pub fn contains(&self, dataset: &str) -> bool {
        self.entries.get(dataset)
            .is_some_and(|entry| self.is_fresh(entry, Instant::now()))
    }

    /// Cached value for `dataset`, or the result of `fetch` stored under it.
    /// A failed fetch leaves the cache untouched.
    pub fn get_or_fetch(&mut self, dataset: &str, fetch: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(dataset) {
            if self.is_fresh(entry, now) {
                debug!("[cache] hit {dataset}");
                return Ok(entry.value.clone());
            }
            debug!("[cache] expired {dataset}");
        } else {
            debug!("[cache] miss {dataset}");
        }

        let value = Arc::new(fetch()?);
        self.entries.insert(dataset.to_string(), Entry { value: value.clone(), fetched_at: now });
        Ok(value)
    }

    /// Drop `dataset`; returns true if it was cached.
    pub fn invalidate(&mut self, dataset: &str) -> bool {
        self.entries.remove(dataset).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
