//! Parallel fan-out of candidate trainings for one round
//!
//! One task is spawned per feature of the round's starting set. Every task
//! captures its own `(features, dataset, removed_feature)` arguments, checks
//! the result cache, then calls the trainer under a per-attempt timeout with
//! bounded retries. The round only completes once every task has joined; the
//! first fatal failure aborts the remaining tasks and fails the whole round.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

use shared::{round_debug, round_error, round_warn, DatasetHandle, FeatureSet, Round, TrainResult};

use crate::config::EliminationConfig;
use crate::core::Fingerprint;
use crate::error::{OrchestratorError, OrchestratorResult, TaskError, TrainingError};
use crate::traits::{ResultCache, Trainer};

/// Arguments captured by one spawned candidate task
#[derive(Debug, Clone)]
pub struct CandidateTask {
    pub round: usize,
    pub features: Arc<FeatureSet>,
    pub dataset: Arc<DatasetHandle>,
    pub removed_feature: String,
}

impl CandidateTask {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(&self.features, &self.removed_feature, &self.dataset)
    }

    /// Resolve this candidate from cache or by training it
    pub async fn execute<T, C>(
        &self,
        trainer: &T,
        cache: &C,
        config: &EliminationConfig,
    ) -> Result<TrainResult, TaskError>
    where
        T: Trainer + ?Sized,
        C: ResultCache + ?Sized,
    {
        let fingerprint = self.fingerprint();

        let cached = cache.get(&fingerprint).await.map_err(|e| TaskError::Cache {
            message: e.to_string(),
        })?;
        if let Some(result) = cached {
            round_debug!(
                self.round,
                "♻️ Cache hit for '{}' ({})",
                self.removed_feature,
                fingerprint.short()
            );
            return self.check_result(result);
        }

        let result = self.train_with_retries(trainer, config).await?;

        cache.put(&fingerprint, &result).await.map_err(|e| TaskError::Cache {
            message: e.to_string(),
        })?;
        Ok(result)
    }

    async fn train_with_retries<T>(&self, trainer: &T, config: &EliminationConfig) -> Result<TrainResult, TaskError>
    where
        T: Trainer + ?Sized,
    {
        let mut attempt: u32 = 0;

        loop {
            let outcome = timeout(
                config.task_timeout,
                trainer.train(&self.features, &self.dataset, &self.removed_feature),
            )
            .await;

            let error = match outcome {
                Ok(Ok(result)) => return self.check_result(result),
                Ok(Err(e)) if !e.is_retryable() => return Err(TaskError::Training(e)),
                Ok(Err(e)) => TaskError::Training(e),
                Err(_) => TaskError::Timeout {
                    timeout: config.task_timeout,
                    attempts: attempt + 1,
                },
            };

            if attempt >= config.max_retries {
                return Err(error);
            }

            let delay = config.backoff_for(attempt);
            round_warn!(
                self.round,
                "⏳ Candidate '{}' failed (attempt {}): {}. Retrying in {}ms",
                self.removed_feature,
                attempt + 1,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// A result for another feature would break the round's one-to-one mapping
    fn check_result(&self, result: TrainResult) -> Result<TrainResult, TaskError> {
        if result.removed_feature != self.removed_feature {
            return Err(TaskError::Training(TrainingError::Failed {
                message: format!(
                    "trainer returned a result for '{}' while scoring '{}'",
                    result.removed_feature, self.removed_feature
                ),
            }));
        }
        Ok(result)
    }
}

/// Dispatches one trainer call per remaining feature and joins them into a round
pub struct ParallelFanOut<T, C>
where
    T: Trainer + 'static,
    C: ResultCache + 'static,
{
    trainer: Arc<T>,
    cache: Arc<C>,
    config: Arc<EliminationConfig>,
}

impl<T, C> ParallelFanOut<T, C>
where
    T: Trainer + 'static,
    C: ResultCache + 'static,
{
    pub fn new(trainer: Arc<T>, cache: Arc<C>, config: EliminationConfig) -> OrchestratorResult<Self> {
        config.validate()?;
        Ok(Self {
            trainer,
            cache,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &EliminationConfig {
        &self.config
    }

    /// Run every candidate of `features` and return the completed round
    ///
    /// Dropping the returned future aborts all in-flight candidates.
    pub async fn run_round(
        &self,
        round: usize,
        features: &FeatureSet,
        dataset: &DatasetHandle,
    ) -> OrchestratorResult<Round> {
        let shared_features = Arc::new(features.clone());
        let shared_dataset = Arc::new(dataset.clone());
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set = JoinSet::new();
        let mut candidates = HashMap::with_capacity(features.len());

        for feature in features.iter() {
            let task = CandidateTask {
                round,
                features: Arc::clone(&shared_features),
                dataset: Arc::clone(&shared_dataset),
                removed_feature: feature.to_string(),
            };
            let trainer = Arc::clone(&self.trainer);
            let cache = Arc::clone(&self.cache);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);

            let handle = join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => task.execute(trainer.as_ref(), cache.as_ref(), &config).await,
                    Err(e) => Err(TaskError::Join { message: e.to_string() }),
                };
                (task.removed_feature, outcome)
            });
            candidates.insert(handle.id(), feature.to_string());
        }

        round_debug!(round, "🔀 Spawned {} candidate tasks", features.len());

        let mut results = Vec::with_capacity(features.len());
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((_, (_, Ok(result)))) => results.push(result),
                Ok((_, (feature, Err(source)))) => {
                    round_error!(round, "❌ Candidate '{}' failed: {}", feature, source);
                    join_set.abort_all();
                    return Err(OrchestratorError::RoundFailure { round, feature, source });
                }
                Err(e) => {
                    // A panicking task loses its return value; its id still names the candidate
                    let feature = candidates
                        .remove(&e.id())
                        .unwrap_or_else(|| "unknown".to_string());
                    round_error!(round, "❌ Candidate '{}' did not complete: {}", feature, e);
                    join_set.abort_all();
                    return Err(OrchestratorError::RoundFailure {
                        round,
                        feature,
                        source: TaskError::Join { message: e.to_string() },
                    });
                }
            }
        }

        Ok(Round::new(round, features.clone(), results)?)
    }
}
