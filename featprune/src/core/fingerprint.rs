//! Deterministic task fingerprints for fan-out result reuse

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::{DatasetHandle, FeatureSet};
use std::fmt;

/// Key over a candidate task's inputs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint of training `features` minus `removed_feature` on `dataset`
    ///
    /// Components are JSON-quoted so identifiers containing separators
    /// cannot collide with each other.
    pub fn compute(features: &FeatureSet, removed_feature: &str, dataset: &DatasetHandle) -> Self {
        let quote = |s: &str| serde_json::Value::String(s.to_string()).to_string();

        let feature_list = features.iter().map(quote).collect::<Vec<_>>().join(",");
        let parts = [
            format!("dataset={}", quote(dataset.id())),
            format!("features=[{feature_list}]"),
            format!("removed={}", quote(removed_feature)),
        ];

        let mut hasher = Sha256::new();
        hasher.update(parts.join("\n").as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }

    /// First eight bytes as an integer, for seeding deterministic generators
    ///
    /// Values that are not hex (only possible through `from_hex`) seed with 0.
    pub fn seed(&self) -> u64 {
        let prefix = self.0.get(..16).unwrap_or(&self.0);
        u64::from_str_radix(prefix, 16).unwrap_or(0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
