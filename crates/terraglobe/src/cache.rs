//! Byte caches for fetched overlay data.
//!
//! Overlay rasters are fetched repeatedly as layers toggle on and off, so
//! the client checks a [`Cache`] before going to the network or disk.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

use crate::error::Result;

/// Future type for cache get operations.
pub type GetFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>>> + Send + 'a>>;

/// Future type for cache put/clear operations.
pub type CacheFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A cache keyed by resource path, storing raw bytes.
pub trait Cache: Send + Sync {
    /// Get cached bytes, `Ok(None)` on a miss.
    fn get(&self, key: &str) -> GetFuture<'_>;

    /// Store bytes under a key.
    fn put(&self, key: &str, data: Vec<u8>) -> CacheFuture<'_>;

    /// Drop everything.
    fn clear(&self) -> CacheFuture<'_>;
}

/// A cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl Cache for NoCache {
    fn get(&self, _key: &str) -> GetFuture<'_> {
        Box::pin(async { Ok(None) })
    }

    fn put(&self, _key: &str, _data: Vec<u8>) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn clear(&self) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

/// An in-memory cache with an optional byte budget.
///
/// When the budget would be exceeded, the oldest entries are evicted first.
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    inner: Arc<RwLock<MemoryCacheInner>>,
    max_bytes: Option<usize>,
}

#[derive(Debug, Default)]
struct MemoryCacheInner {
    entries: HashMap<String, Vec<u8>>,
    /// Insertion order, oldest first.
    order: Vec<String>,
    total_bytes: usize,
}

impl MemoryCache {
    /// Cache with no byte budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that evicts oldest entries past `max_bytes`.
    #[must_use]
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_bytes: Some(max_bytes),
        }
    }

    /// Total bytes currently held.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.read().unwrap().total_bytes
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Whether the cache holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> GetFuture<'_> {
        let result = self.inner.read().unwrap().entries.get(key).cloned();
        Box::pin(async move { Ok(result) })
    }

    fn put(&self, key: &str, data: Vec<u8>) -> CacheFuture<'_> {
        let key = key.to_string();
        let mut inner = self.inner.write().unwrap();

        if let Some(old) = inner.entries.remove(&key) {
            inner.total_bytes -= old.len();
            inner.order.retain(|k| k != &key);
        }

        if let Some(max_bytes) = self.max_bytes {
            while inner.total_bytes + data.len() > max_bytes && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                if let Some(old) = inner.entries.remove(&oldest) {
                    inner.total_bytes -= old.len();
                }
            }
        }

        inner.total_bytes += data.len();
        inner.entries.insert(key.clone(), data);
        inner.order.push(key);

        Box::pin(async { Ok(()) })
    }

    fn clear(&self) -> CacheFuture<'_> {
        let mut inner = self.inner.write().unwrap();
        inner.entries.clear();
        inner.order.clear();
        inner.total_bytes = 0;
        Box::pin(async { Ok(()) })
    }
}
