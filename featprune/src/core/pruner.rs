//! Round reduction: choose the feature whose removal hurts least
//!
//! The least harmful removal is the candidate whose model kept the highest
//! score. Ties go to the feature that comes first in the round's starting
//! feature set, so identical rounds always prune identically.

use shared::{FeatureSet, Round, RoundSummary, TrainResult};

use crate::error::PruneError;

pub struct Pruner;

impl Pruner {
    /// Result of the candidate to drop from `round`
    pub fn select(round: &Round) -> Result<&TrainResult, PruneError> {
        if round.is_empty() {
            return Err(PruneError::EmptyRound { round: round.index() });
        }
        if round.features().len() < 2 {
            return Err(PruneError::TooFewCandidates {
                round: round.index(),
                candidates: round.features().len(),
            });
        }

        let mut best: Option<(&TrainResult, usize)> = None;
        for result in round.results() {
            if !result.score.is_finite() {
                return Err(PruneError::InvalidScore {
                    round: round.index(),
                    feature: result.removed_feature.clone(),
                });
            }
            let position = round.features().position(&result.removed_feature).ok_or_else(|| {
                shared::SharedError::UnknownFeature {
                    feature: result.removed_feature.clone(),
                }
            })?;

            let better = match best {
                None => true,
                Some((current, current_position)) => {
                    result.score > current.score
                        || (result.score == current.score && position < current_position)
                }
            };
            if better {
                best = Some((result, position));
            }
        }

        best.map(|(result, _)| result)
            .ok_or(PruneError::EmptyRound { round: round.index() })
    }

    /// Next feature set: the round's starting set minus the selected feature
    pub fn prune(round: &Round) -> Result<FeatureSet, PruneError> {
        let selected = Self::select(round)?;
        Ok(round.features().without(&selected.removed_feature)?)
    }

    pub fn summarize(round: &Round) -> Result<RoundSummary, PruneError> {
        let selected = Self::select(round)?;
        Ok(RoundSummary {
            round: round.index(),
            width: round.len(),
            pruned: selected.removed_feature.clone(),
            best_score: selected.score,
        })
    }
}
