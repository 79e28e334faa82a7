//! History accumulation and derived views for reporting

use shared::{FeatureSet, History, Round, RoundSummary};

use crate::core::pruner::Pruner;
use crate::error::{OrchestratorError, OrchestratorResult, PruneError};

pub struct HistoryAccumulator;

impl HistoryAccumulator {
    /// New history with `round` appended
    ///
    /// Rounds must arrive in index order; the input history is never modified.
    pub fn accumulate(history: &History, round: Round) -> OrchestratorResult<History> {
        if round.index() != history.len() {
            return Err(OrchestratorError::RoundOutOfOrder {
                expected: history.len(),
                found: round.index(),
            });
        }
        Ok(history.with_round(round))
    }

    /// Per-round digests in round order
    pub fn summaries(history: &History) -> Result<Vec<RoundSummary>, PruneError> {
        history.iter().map(Pruner::summarize).collect()
    }

    /// Features in the order they were pruned
    pub fn removed_features(history: &History) -> Result<Vec<String>, PruneError> {
        history
            .iter()
            .map(|round| Pruner::select(round).map(|r| r.removed_feature.clone()))
            .collect()
    }

    /// Features still retained after the last committed round
    pub fn surviving_features(history: &History) -> Result<Option<FeatureSet>, PruneError> {
        history.last().map(Pruner::prune).transpose()
    }
}
