//! Parallel backward feature elimination
//!
//! This library runs greedy backward elimination as a dynamic graph: each
//! round fans out one training task per remaining feature, joins on a
//! barrier, prunes the feature whose removal scored best and recurses on
//! the smaller set until the requested depth is reached.

pub mod config;
pub mod core;
pub mod error;
pub mod fanout;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::{EliminationConfig, FailurePolicy};
pub use crate::core::{EliminationState, Fingerprint, HistoryAccumulator, Pruner};
pub use error::{OrchestratorError, OrchestratorResult, PruneError, TaskError, TrainingError};
pub use fanout::{CandidateTask, ParallelFanOut};
pub use orchestrator::{CancelHandle, Orchestrator};
pub use services::{FileCache, InMemoryCache, ScoreTableTrainer, SeededRandomTrainer};
pub use traits::{MockResultCache, MockTrainer, ResultCache, Trainer};
