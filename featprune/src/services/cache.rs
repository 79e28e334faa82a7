//! In-memory result cache

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;

use shared::TrainResult;
use crate::core::Fingerprint;
use crate::error::OrchestratorResult;
use crate::traits::ResultCache;

/// Hit and miss counters for a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Process-local cache shared by all fan-out tasks
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<Fingerprint, TrainResult>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(&self, fingerprint: &Fingerprint) -> OrchestratorResult<Option<TrainResult>> {
        let entries = self.entries.read().await;
        let found = entries.get(fingerprint).cloned();

        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(found)
    }

    async fn put(&self, fingerprint: &Fingerprint, result: &TrainResult) -> OrchestratorResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(fingerprint.clone(), result.clone());
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
