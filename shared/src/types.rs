//! Core shared types for feature elimination runs
//!
//! These values flow between the orchestrator, the fan-out tasks and any
//! reporting collaborator. All of them are immutable once built: a new
//! `FeatureSet` or `History` is produced instead of mutating an old one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Ordered collection of unique feature identifiers
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    /// Build a feature set, rejecting empty and duplicate identifiers
    pub fn new<I, S>(features: I) -> SharedResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(features.len());

        for feature in &features {
            if feature.trim().is_empty() {
                return Err(SharedError::InvalidFeatureSet {
                    reason: "feature identifiers cannot be empty".to_string(),
                });
            }
            if !seen.insert(feature.as_str()) {
                return Err(SharedError::DuplicateFeature {
                    feature: feature.clone(),
                });
            }
        }

        Ok(Self(features))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.0.iter().any(|f| f == feature)
    }

    /// Position of a feature in set order
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.0.iter().position(|f| f == feature)
    }

    /// New feature set with `feature` removed, preserving order
    pub fn without(&self, feature: &str) -> SharedResult<Self> {
        let index = self.position(feature).ok_or_else(|| SharedError::UnknownFeature {
            feature: feature.to_string(),
        })?;

        let mut remaining = self.0.clone();
        remaining.remove(index);
        Ok(Self(remaining))
    }
}

impl TryFrom<Vec<String>> for FeatureSet {
    type Error = SharedError;

    fn try_from(features: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(features)
    }
}

impl From<FeatureSet> for Vec<String> {
    fn from(set: FeatureSet) -> Self {
        set.0
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Opaque, read-only reference to training data
///
/// The core never reads through the handle; it only forwards it to the
/// trainer and uses `id` as the dataset identity when fingerprinting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHandle {
    id: String,
    location: Option<String>,
}

impl DatasetHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: None,
        }
    }

    /// Handle with a freshly generated identity
    pub fn random() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attach an opaque location token for the trainer to resolve
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl fmt::Display for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Score of the model trained with `removed_feature` excluded
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainResult {
    pub removed_feature: String,
    pub score: f64,
}

impl TrainResult {
    pub fn new(removed_feature: impl Into<String>, score: f64) -> Self {
        Self {
            removed_feature: removed_feature.into(),
            score,
        }
    }
}

/// Results of one fan-out, one per feature of the starting feature set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    index: usize,
    features: FeatureSet,
    results: Vec<TrainResult>,
}

impl Round {
    /// Assemble a round from results in any completion order
    ///
    /// Results are reordered to follow `features`. Every feature must be
    /// matched by exactly one result.
    pub fn new(index: usize, features: FeatureSet, results: Vec<TrainResult>) -> SharedResult<Self> {
        if results.len() != features.len() {
            return Err(SharedError::IncompleteRound {
                round: index,
                expected: features.len(),
                actual: results.len(),
            });
        }

        let mut slots: Vec<Option<TrainResult>> = vec![None; features.len()];
        for result in results {
            let position = features.position(&result.removed_feature).ok_or_else(|| {
                SharedError::UnknownFeature {
                    feature: result.removed_feature.clone(),
                }
            })?;
            if slots[position].is_some() {
                return Err(SharedError::DuplicateFeature {
                    feature: result.removed_feature,
                });
            }
            slots[position] = Some(result);
        }

        // Lengths match and no slot was filled twice, so every slot is filled
        let results = slots.into_iter().flatten().collect();

        Ok(Self {
            index,
            features,
            results,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Feature set that started this round
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Results in feature set order
    pub fn results(&self) -> &[TrainResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn score_of(&self, feature: &str) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.removed_feature == feature)
            .map(|r| r.score)
    }
}

/// Append-only record of completed rounds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    rounds: Vec<Round>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// New history with `round` appended; `self` is left untouched
    pub fn with_round(&self, round: Round) -> Self {
        let mut rounds = Vec::with_capacity(self.rounds.len() + 1);
        rounds.extend(self.rounds.iter().cloned());
        rounds.push(round);
        Self { rounds }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn last(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }

    /// Number of results per round, in round order
    pub fn widths(&self) -> Vec<usize> {
        self.rounds.iter().map(Round::len).collect()
    }
}

/// Per-round digest for reporting collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub width: usize,
    pub pruned: String,
    pub best_score: f64,
}
