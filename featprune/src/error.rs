//! Error types for feature elimination runs

use shared::{History, SharedError};
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a single trainer call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    #[error("Dataset unavailable: {dataset}")]
    DatasetUnavailable { dataset: String },

    #[error("Feature not in feature set: {feature}")]
    MissingFeature { feature: String },

    #[error("Training failed: {message}")]
    Failed { message: String },

    #[error("Transient training failure: {message}")]
    Transient { message: String },
}

impl TrainingError {
    /// Only transient failures are worth another attempt; the rest are deterministic
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrainingError::Transient { .. })
    }
}

/// Failure of one fan-out candidate after its local retries
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{0}")]
    Training(#[from] TrainingError),

    #[error("Task timed out after {timeout:?} ({attempts} attempt(s))")]
    Timeout { timeout: Duration, attempts: u32 },

    #[error("Result cache failure: {message}")]
    Cache { message: String },

    #[error("Task did not complete: {message}")]
    Join { message: String },
}

/// Reasons a completed round cannot be reduced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PruneError {
    #[error("Round {round} is empty")]
    EmptyRound { round: usize },

    #[error("Round {round} has {candidates} candidate(s), at least 2 are required")]
    TooFewCandidates { round: usize, candidates: usize },

    #[error("Round {round} has a non-finite score for {feature}")]
    InvalidScore { round: usize, feature: String },

    #[error("Round shape error: {0}")]
    Shape(#[from] SharedError),
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Invalid depth {depth}: must satisfy 0 < depth < {feature_count}")]
    InvalidDepth { depth: usize, feature_count: usize },

    #[error("Round {round} failed on candidate '{feature}': {source}")]
    RoundFailure {
        round: usize,
        feature: String,
        #[source]
        source: TaskError,
    },

    #[error("Round {round} could not be pruned: {source}")]
    Prune {
        round: usize,
        #[source]
        source: PruneError,
    },

    #[error("Round {found} committed out of order, expected round {expected}")]
    RoundOutOfOrder { expected: usize, found: usize },

    #[error("Round {round} was not started from the current feature set")]
    RoundMismatch { round: usize },

    #[error("Run cancelled during round {round}")]
    Cancelled { round: usize },

    #[error("Run stopped after {} completed round(s): {source}", .completed.len())]
    Incomplete {
        completed: History,
        #[source]
        source: Box<OrchestratorError>,
    },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Cache error: {message}")]
    CacheError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OrchestratorError {
    pub fn config(field: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError { field: field.into() }
    }

    /// Round index the failure is tagged with, if any
    pub fn round(&self) -> Option<usize> {
        match self {
            OrchestratorError::RoundFailure { round, .. }
            | OrchestratorError::Prune { round, .. }
            | OrchestratorError::RoundMismatch { round }
            | OrchestratorError::Cancelled { round } => Some(*round),
            OrchestratorError::RoundOutOfOrder { found, .. } => Some(*found),
            OrchestratorError::Incomplete { source, .. } => source.round(),
            _ => None,
        }
    }

    /// Candidate feature the failure is tagged with, if any
    pub fn feature(&self) -> Option<&str> {
        match self {
            OrchestratorError::RoundFailure { feature, .. } => Some(feature),
            OrchestratorError::Incomplete { source, .. } => source.feature(),
            _ => None,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
