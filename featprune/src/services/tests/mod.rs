//! Service-specific tests
//!
//! Each service has its own test file with dedicated fixtures and helpers.


// Common test utilities for services
pub mod common {
    use shared::{DatasetHandle, FeatureSet};

    use crate::core::Fingerprint;

    pub fn features(names: &[&str]) -> FeatureSet {
        FeatureSet::new(names.iter().copied()).expect("valid test feature set")
    }

    pub fn dataset() -> DatasetHandle {
        DatasetHandle::new("services-test-dataset")
    }

    pub fn fingerprint(names: &[&str], removed: &str) -> Fingerprint {
        Fingerprint::compute(&features(names), removed, &dataset())
    }
}
