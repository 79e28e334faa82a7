//! Test fixtures and data for elimination tests
//!
//! This module provides consistent test data and fixtures used across all test suites.

use featprune::ScoreTableTrainer;
use shared::{DatasetHandle, FeatureSet};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const DATASET_ID: &'static str = "housing-2024";

    /// Scores for the four-feature worked example, round 0
    pub const ROUND_0_SCORES: [(&'static str, f64); 4] = [("A", 0.10), ("B", 0.50), ("C", 0.20), ("D", 0.55)];

    /// Scores for the worked example once D is gone
    pub const ROUND_1_SCORES: [(&'static str, f64); 3] = [("A", 0.30), ("B", 0.60), ("C", 0.25)];

    pub fn dataset() -> DatasetHandle {
        DatasetHandle::new(Self::DATASET_ID).with_location("memory://housing-2024")
    }

    pub fn abcd() -> FeatureSet {
        FeatureSet::new(["A", "B", "C", "D"]).unwrap()
    }

    /// `f0, f1, ...` feature set of width `n`
    pub fn numbered(n: usize) -> FeatureSet {
        FeatureSet::new((0..n).map(|i| format!("f{i}"))).unwrap()
    }

    /// Trainer replaying both rounds of the worked example
    pub fn worked_example_trainer() -> ScoreTableTrainer {
        Self::first_round_only_trainer().with_round(&["A", "B", "C"], &Self::ROUND_1_SCORES)
    }

    /// Trainer that knows round 0 of the worked example and fails afterwards
    pub fn first_round_only_trainer() -> ScoreTableTrainer {
        ScoreTableTrainer::new()
            .for_dataset(Self::DATASET_ID)
            .with_round(&["A", "B", "C", "D"], &Self::ROUND_0_SCORES)
    }
}
