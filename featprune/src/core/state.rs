//! Elimination run state machine
//!
//! Pure state for one run: the round index, the feature set the next round
//! starts from, and the history of committed rounds. No I/O happens here, so
//! transitions can be tested without a trainer.

use shared::{FeatureSet, History, Round, RoundSummary};

use crate::core::history::HistoryAccumulator;
use crate::core::pruner::Pruner;
use crate::error::{OrchestratorError, OrchestratorResult, PruneError};

#[derive(Debug, Clone)]
pub struct EliminationState {
    depth: usize,
    round: usize,
    features: FeatureSet,
    history: History,
}

impl EliminationState {
    /// Initial state; fails before any work when `depth` is out of range
    pub fn new(depth: usize, initial: FeatureSet) -> OrchestratorResult<Self> {
        if depth == 0 || depth >= initial.len() {
            return Err(OrchestratorError::InvalidDepth {
                depth,
                feature_count: initial.len(),
            });
        }

        Ok(Self {
            depth,
            round: 0,
            features: initial,
            history: History::new(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.round == self.depth
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Commit a completed round and move to the next one
    ///
    /// On error the state is left exactly as it was.
    pub fn advance(&mut self, round: Round) -> OrchestratorResult<RoundSummary> {
        if round.index() != self.round {
            return Err(OrchestratorError::RoundOutOfOrder {
                expected: self.round,
                found: round.index(),
            });
        }
        if round.features() != &self.features {
            return Err(OrchestratorError::RoundMismatch { round: round.index() });
        }

        let prune_err = |source: PruneError| OrchestratorError::Prune {
            round: self.round,
            source,
        };
        let summary = Pruner::summarize(&round).map_err(prune_err)?;
        let next_features = Pruner::prune(&round).map_err(prune_err)?;
        let next_history = HistoryAccumulator::accumulate(&self.history, round)?;

        self.features = next_features;
        self.history = next_history;
        self.round += 1;
        Ok(summary)
    }

    pub fn into_history(self) -> History {
        self.history
    }
}
