//! Run configuration
//!
//! ## Configuration Sources
//! Values are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Environment variables take precedence over .env file values. Anything not
//! set falls back to `EliminationConfig::default()`.
//!
//! ## Variables
//! - `FEATPRUNE_MAX_CONCURRENCY`: trainer calls in flight per round
//! - `FEATPRUNE_TASK_TIMEOUT_MS`: per-attempt deadline for one candidate
//! - `FEATPRUNE_MAX_RETRIES`: extra attempts after a transient failure or timeout
//! - `FEATPRUNE_RETRY_BACKOFF_MS`: base delay, doubled after every attempt
//! - `FEATPRUNE_KEEP_COMPLETED`: `true` to return completed rounds on failure

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{OrchestratorError, OrchestratorResult};

/// What a failed run hands back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Discard the whole run; only the error is returned
    #[default]
    Discard,
    /// Return fully committed rounds inside `OrchestratorError::Incomplete`
    KeepCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationConfig {
    pub max_concurrency: usize,
    pub task_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            task_timeout: Duration::from_secs(300),
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
            failure_policy: FailurePolicy::Discard,
        }
    }
}

impl EliminationConfig {
    const MAX_CONCURRENCY: &'static str = "FEATPRUNE_MAX_CONCURRENCY";
    const TASK_TIMEOUT_MS: &'static str = "FEATPRUNE_TASK_TIMEOUT_MS";
    const MAX_RETRIES: &'static str = "FEATPRUNE_MAX_RETRIES";
    const RETRY_BACKOFF_MS: &'static str = "FEATPRUNE_RETRY_BACKOFF_MS";
    const KEEP_COMPLETED: &'static str = "FEATPRUNE_KEEP_COMPLETED";

    /// Load from `.env` and the process environment
    pub fn from_env() -> OrchestratorResult<Self> {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> OrchestratorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var::<usize>(&lookup, Self::MAX_CONCURRENCY)? {
            config.max_concurrency = value;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, Self::TASK_TIMEOUT_MS)? {
            config.task_timeout = Duration::from_millis(ms);
        }
        if let Some(value) = parse_var::<u32>(&lookup, Self::MAX_RETRIES)? {
            config.max_retries = value;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, Self::RETRY_BACKOFF_MS)? {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(keep) = parse_var::<bool>(&lookup, Self::KEEP_COMPLETED)? {
            config.failure_policy = if keep {
                FailurePolicy::KeepCompleted
            } else {
                FailurePolicy::Discard
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn validate(&self) -> OrchestratorResult<()> {
        if self.max_concurrency == 0 {
            return Err(OrchestratorError::config("max_concurrency must be at least 1"));
        }
        if self.task_timeout.is_zero() {
            return Err(OrchestratorError::config("task_timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Delay before retry number `attempt + 1`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> OrchestratorResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| OrchestratorError::config(format!("{key}={raw}: {e}"))),
    }
}
