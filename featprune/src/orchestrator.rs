//! Recursive prune loop
//!
//! The orchestrator owns a single control flow that suspends at round
//! boundaries. Each iteration fans out one candidate per remaining feature,
//! waits for the whole round, commits it to the run state and only then
//! schedules the next round from the pruned feature set.

use std::sync::Arc;
use tokio::sync::watch;

use shared::{logging, round_debug, round_info, DatasetHandle, FeatureSet, History};

use crate::config::{EliminationConfig, FailurePolicy};
use crate::core::EliminationState;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::fanout::ParallelFanOut;
use crate::traits::{ResultCache, Trainer};

/// Requests cancellation of every run on the orchestrator it came from
///
/// Cancellation is sticky: once requested, current and future runs stop at
/// their next opportunity with `OrchestratorError::Cancelled` until `reset`
/// is called.
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Allow new runs again; a run already stopped stays stopped
    pub fn reset(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Drives backward elimination for a caller-supplied depth
pub struct Orchestrator<T, C>
where
    T: Trainer + 'static,
    C: ResultCache + 'static,
{
    fan_out: ParallelFanOut<T, C>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl<T, C> Orchestrator<T, C>
where
    T: Trainer + 'static,
    C: ResultCache + 'static,
{
    /// Create an orchestrator with injected trainer and cache
    pub fn new(trainer: Arc<T>, cache: Arc<C>, config: EliminationConfig) -> OrchestratorResult<Self> {
        let (cancel_tx, _) = watch::channel(false);

        Ok(Self {
            fan_out: ParallelFanOut::new(trainer, cache, config)?,
            cancel_tx: Arc::new(cancel_tx),
        })
    }

    pub fn config(&self) -> &EliminationConfig {
        self.fan_out.config()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Remove `depth` features from `initial`, one per round
    ///
    /// Returns the history of all `depth` rounds. The depth is checked before
    /// any trainer call is made.
    pub async fn run(
        &self,
        depth: usize,
        initial: FeatureSet,
        dataset: &DatasetHandle,
    ) -> OrchestratorResult<History> {
        let mut state = EliminationState::new(depth, initial)?;
        let mut cancel_rx = self.cancel_tx.subscribe();

        logging::log_startup(&format!(
            "elimination of {} feature(s) from {} on dataset {}",
            depth,
            state.features().len(),
            dataset
        ));

        while !state.is_terminal() {
            let index = state.round();

            if *cancel_rx.borrow_and_update() {
                return Err(OrchestratorError::Cancelled { round: index });
            }

            round_debug!(index, "🔁 Starting round over {}", state.features());

            // The fan-out borrows the current feature set, so it is resolved
            // in its own scope before the state is advanced.
            let outcome = {
                let features = state.features();
                tokio::select! {
                    biased;
                    _ = wait_for_cancel(&mut cancel_rx) => None,
                    round = self.fan_out.run_round(index, features, dataset) => Some(round),
                }
            };

            let round = match outcome {
                None => {
                    round_info!(index, "🛑 Run cancelled, in-flight candidates aborted");
                    return Err(OrchestratorError::Cancelled { round: index });
                }
                Some(Err(e)) => return Err(self.fail(&state, e)),
                Some(Ok(round)) => round,
            };

            let summary = match state.advance(round) {
                Ok(summary) => summary,
                Err(e) => return Err(self.fail(&state, e)),
            };

            logging::log_progress(
                &format!("Round {index}"),
                &format!(
                    "pruned '{}' (best score {:.4}), {} feature(s) remain",
                    summary.pruned,
                    summary.best_score,
                    state.features().len()
                ),
            );
        }

        logging::log_success(&format!(
            "Elimination finished after {} round(s), surviving features {}",
            state.round(),
            state.features()
        ));

        Ok(state.into_history())
    }

    /// Shape a fatal error according to the configured failure policy
    fn fail(&self, state: &EliminationState, error: OrchestratorError) -> OrchestratorError {
        logging::log_error(&format!("Elimination round {}", state.round()), &error);

        match self.config().failure_policy {
            FailurePolicy::Discard => error,
            FailurePolicy::KeepCompleted => OrchestratorError::Incomplete {
                completed: state.history().clone(),
                source: Box::new(error),
            },
        }
    }
}

/// Resolves once cancellation has been requested
async fn wait_for_cancel(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            // Sender gone: cancellation can no longer happen
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryCache;
    use crate::traits::MockTrainer;
    use shared::TrainResult;
    use std::time::Duration;

    fn abcd() -> FeatureSet {
        FeatureSet::new(["A", "B", "C", "D"]).unwrap()
    }

    fn constant_trainer() -> MockTrainer {
        let mut trainer = MockTrainer::new();
        trainer
            .expect_train()
            .returning(|_, _, removed| Ok(TrainResult::new(removed, 0.5)));
        trainer
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = EliminationConfig::default().with_max_concurrency(0);
        let result = Orchestrator::new(
            Arc::new(MockTrainer::new()),
            Arc::new(InMemoryCache::new()),
            config,
        );
        assert!(matches!(result, Err(OrchestratorError::ConfigurationError { .. })));
    }

    #[tokio::test]
    async fn test_invalid_depth_dispatches_nothing() {
        let mut trainer = MockTrainer::new();
        trainer.expect_train().times(0);

        let orchestrator = Orchestrator::new(
            Arc::new(trainer),
            Arc::new(InMemoryCache::new()),
            EliminationConfig::default(),
        )
        .unwrap();

        let err = orchestrator
            .run(4, abcd(), &DatasetHandle::new("d"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidDepth { depth: 4, feature_count: 4 }));
    }

    #[tokio::test]
    async fn test_constant_scores_prune_in_order() {
        let orchestrator = Orchestrator::new(
            Arc::new(constant_trainer()),
            Arc::new(InMemoryCache::new()),
            EliminationConfig::default(),
        )
        .unwrap();

        let history = orchestrator
            .run(3, abcd(), &DatasetHandle::new("d"))
            .await
            .unwrap();

        // Every tie goes to the earliest feature
        let firsts: Vec<&str> = history
            .iter()
            .map(|round| round.features().as_slice()[0].as_str())
            .collect();
        assert_eq!(firsts, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_cancel_before_run() {
        let mut trainer = MockTrainer::new();
        trainer.expect_train().times(0);

        let orchestrator = Orchestrator::new(
            Arc::new(trainer),
            Arc::new(InMemoryCache::new()),
            EliminationConfig::default().with_task_timeout(Duration::from_secs(1)),
        )
        .unwrap();

        let handle = orchestrator.cancel_handle();
        handle.cancel();
        assert!(handle.is_cancelled());

        let err = orchestrator
            .run(1, abcd(), &DatasetHandle::new("d"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Cancelled { round: 0 }));
    }

    #[tokio::test]
    async fn test_reset_allows_new_runs() {
        let orchestrator = Orchestrator::new(
            Arc::new(constant_trainer()),
            Arc::new(InMemoryCache::new()),
            EliminationConfig::default(),
        )
        .unwrap();

        let handle = orchestrator.cancel_handle();
        handle.cancel();
        assert!(orchestrator.run(1, abcd(), &DatasetHandle::new("d")).await.is_err());

        handle.reset();
        assert!(!handle.is_cancelled());
        let history = orchestrator
            .run(1, abcd(), &DatasetHandle::new("d"))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }
}
