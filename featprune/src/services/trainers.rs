//! Reference trainer implementations
//!
//! Real model fitting lives outside this crate. These trainers exist for
//! fixtures, demos and smoke runs:
//! - `ScoreTableTrainer`: replays fixed scores per feature set
//! - `SeededRandomTrainer`: scores drawn from an RNG seeded by the task fingerprint

use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared::{DatasetHandle, FeatureSet, TrainResult};
use crate::core::Fingerprint;
use crate::error::TrainingError;
use crate::traits::Trainer;

fn ensure_candidate(features: &FeatureSet, removed_feature: &str) -> Result<(), TrainingError> {
    if features.contains(removed_feature) {
        Ok(())
    } else {
        Err(TrainingError::MissingFeature {
            feature: removed_feature.to_string(),
        })
    }
}

/// Trainer that looks scores up in per-feature-set tables
#[derive(Debug, Clone, Default)]
pub struct ScoreTableTrainer {
    dataset_id: Option<String>,
    tables: HashMap<Vec<String>, HashMap<String, f64>>,
    fallback: HashMap<String, f64>,
    delay: Duration,
}

impl ScoreTableTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores used when the trainer sees exactly `features`
    pub fn with_round(mut self, features: &[&str], scores: &[(&str, f64)]) -> Self {
        let key = features.iter().map(|f| f.to_string()).collect();
        let table = scores.iter().map(|(f, s)| (f.to_string(), *s)).collect();
        self.tables.insert(key, table);
        self
    }

    /// Scores used for any feature set without its own table
    pub fn with_fallback(mut self, scores: &[(&str, f64)]) -> Self {
        self.fallback = scores.iter().map(|(f, s)| (f.to_string(), *s)).collect();
        self
    }

    /// Reject every dataset except `dataset_id`
    pub fn for_dataset(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }

    /// Simulated training latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Trainer for ScoreTableTrainer {
    async fn train(
        &self,
        features: &FeatureSet,
        dataset: &DatasetHandle,
        removed_feature: &str,
    ) -> Result<TrainResult, TrainingError> {
        if let Some(expected) = &self.dataset_id {
            if expected != dataset.id() {
                return Err(TrainingError::DatasetUnavailable {
                    dataset: dataset.id().to_string(),
                });
            }
        }
        ensure_candidate(features, removed_feature)?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let score = self
            .tables
            .get(features.as_slice())
            .and_then(|table| table.get(removed_feature))
            .or_else(|| self.fallback.get(removed_feature))
            .copied()
            .ok_or_else(|| TrainingError::Failed {
                message: format!("no score configured for '{removed_feature}' in {features}"),
            })?;

        Ok(TrainResult::new(removed_feature, score))
    }
}

/// Trainer producing reproducible pseudo-random scores in `[0, 1)`
#[derive(Debug, Clone, Default)]
pub struct SeededRandomTrainer {
    salt: u64,
    delay: Duration,
}

impl SeededRandomTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Different salts give different, still reproducible, score streams
    pub fn with_salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Trainer for SeededRandomTrainer {
    async fn train(
        &self,
        features: &FeatureSet,
        dataset: &DatasetHandle,
        removed_feature: &str,
    ) -> Result<TrainResult, TrainingError> {
        ensure_candidate(features, removed_feature)?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let seed = Fingerprint::compute(features, removed_feature, dataset).seed() ^ self.salt;
        let mut rng = StdRng::seed_from_u64(seed);
        let score: f64 = rng.gen_range(0.0..1.0);

        Ok(TrainResult::new(removed_feature, score))
    }
}
