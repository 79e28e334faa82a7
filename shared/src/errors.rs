//! Shared error types for the feature elimination system

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid feature set: {reason}")]
    InvalidFeatureSet { reason: String },

    #[error("Duplicate feature: {feature}")]
    DuplicateFeature { feature: String },

    #[error("Unknown feature: {feature}")]
    UnknownFeature { feature: String },

    #[error("Round {round} incomplete: expected {expected} results, got {actual}")]
    IncompleteRound { round: usize, expected: usize, actual: usize },

    #[error("Unsupported message version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },

    #[error("Unexpected message kind: expected {expected}, got {found}")]
    UnexpectedKind { expected: String, found: String },

    #[error("Serialization failed: {message}")]
    SerializationError { message: String },

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
