//! Test helpers and builder patterns for elimination tests
//!
//! This module provides convenient helper functions and builder patterns
//! to reduce test boilerplate and improve maintainability.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use featprune::*;
use shared::{DatasetHandle, FeatureSet, History, TrainResult};

/// Trainer wrapper that records how it was called
pub struct CountingTrainer<T> {
    inner: T,
    started: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl<T: Trainer> CountingTrainer<T> {
    pub fn new(inner: T) -> Arc<Self> {
        Arc::new(Self {
            inner,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// Trainer invocations, including ones that never returned
    pub fn calls(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous trainer calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Trainer> Trainer for CountingTrainer<T> {
    async fn train(
        &self,
        features: &FeatureSet,
        dataset: &DatasetHandle,
        removed_feature: &str,
    ) -> Result<TrainResult, TrainingError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.inner.train(features, dataset, removed_feature).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Builder for test orchestrators with fast retry settings
pub struct OrchestratorBuilder {
    config: EliminationConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: EliminationConfig::default()
                .with_task_timeout(Duration::from_secs(5))
                .with_retry_backoff(Duration::from_millis(1)),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config = self.config.with_max_concurrency(max_concurrency);
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.config = self.config.with_task_timeout(task_timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    pub fn keep_completed(mut self) -> Self {
        self.config = self.config.with_failure_policy(FailurePolicy::KeepCompleted);
        self
    }

    /// Build with a fresh in-memory cache
    pub fn build<T: Trainer + 'static>(self, trainer: Arc<T>) -> Orchestrator<T, InMemoryCache> {
        self.build_with_cache(trainer, Arc::new(InMemoryCache::new()))
    }

    pub fn build_with_cache<T, C>(self, trainer: Arc<T>, cache: Arc<C>) -> Orchestrator<T, C>
    where
        T: Trainer + 'static,
        C: ResultCache + 'static,
    {
        Orchestrator::new(trainer, cache, self.config).unwrap()
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for common test assertions
pub struct TestHelpers;

impl TestHelpers {
    pub fn removed(history: &History) -> Vec<String> {
        HistoryAccumulator::removed_features(history).unwrap()
    }

    pub fn survivors(history: &History) -> Vec<String> {
        HistoryAccumulator::surviving_features(history)
            .unwrap()
            .map(|set| set.as_slice().to_vec())
            .unwrap_or_default()
    }

    /// Every round starts where the previous one pruned
    pub fn assert_chained(history: &History) {
        for (i, pair) in history.rounds().windows(2).enumerate() {
            let expected = Pruner::prune(&pair[0]).unwrap();
            assert_eq!(pair[1].features(), &expected, "round {} does not follow round {}", i + 1, i);
        }
        for (i, round) in history.iter().enumerate() {
            assert_eq!(round.index(), i);
        }
    }
}
