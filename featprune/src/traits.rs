//! Trait definitions with mockall annotations for testing
//!
//! The orchestrator only talks to its collaborators through these traits:
//! the trainer that scores candidate models and the cache that remembers
//! scores by task fingerprint.

use shared::{DatasetHandle, FeatureSet, TrainResult};

use crate::core::Fingerprint;
use crate::error::{OrchestratorResult, TrainingError};

/// Model scoring capability
///
/// Implementations must be deterministic for a given
/// `(features, dataset, removed_feature)` triple, otherwise cached results
/// would not match a fresh run.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Trainer: Send + Sync {
    /// Train on `features` minus `removed_feature` and score the model
    ///
    /// # Parameters
    /// - `features`: Feature set under consideration this round
    /// - `dataset`: Read-only training data handle
    /// - `removed_feature`: Feature excluded from this candidate model
    ///
    /// # Returns
    /// Score of the candidate model, or a `TrainingError` when the dataset
    /// cannot be read or `removed_feature` is not in `features`
    async fn train(
        &self,
        features: &FeatureSet,
        dataset: &DatasetHandle,
        removed_feature: &str,
    ) -> Result<TrainResult, TrainingError>;
}

/// Fingerprint-keyed store of previously computed results
#[mockall::automock]
#[async_trait::async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a previously stored result
    async fn get(&self, fingerprint: &Fingerprint) -> OrchestratorResult<Option<TrainResult>>;

    /// Store a successful result under its fingerprint
    async fn put(&self, fingerprint: &Fingerprint, result: &TrainResult) -> OrchestratorResult<()>;

    /// Number of stored results
    async fn len(&self) -> usize;
}
