//! Envelope codec with JSON and compact binary encodings

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};
use crate::types::{History, Round, TrainResult};

/// Current wire version; bump on any breaking payload change
pub const CODEC_VERSION: u16 = 1;

/// Payload types that may be shipped inside an envelope
pub trait WireMessage: Serialize + DeserializeOwned {
    const KIND: &'static str;
}

impl WireMessage for TrainResult {
    const KIND: &'static str = "train_result";
}

impl WireMessage for Round {
    const KIND: &'static str = "round";
}

impl WireMessage for History {
    const KIND: &'static str = "history";
}

/// Versioned wrapper around a wire payload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Envelope<T> {
    pub version: u16,
    pub kind: String,
    pub payload: T,
}

/// Leading fields of an envelope, decoded before the payload
#[derive(Deserialize)]
struct Header {
    version: u16,
    kind: String,
}

impl Header {
    fn check<T: WireMessage>(&self) -> SharedResult<()> {
        if self.version != CODEC_VERSION {
            return Err(SharedError::UnsupportedVersion {
                found: self.version,
                expected: CODEC_VERSION,
            });
        }
        if self.kind != T::KIND {
            return Err(SharedError::UnexpectedKind {
                expected: T::KIND.to_string(),
                found: self.kind.clone(),
            });
        }
        Ok(())
    }
}

pub fn encode_json<T: WireMessage>(payload: &T) -> SharedResult<String> {
    let envelope = Envelope {
        version: CODEC_VERSION,
        kind: T::KIND.to_string(),
        payload,
    };
    serde_json::to_string(&envelope).map_err(|e| SharedError::SerializationError {
        message: e.to_string(),
    })
}

pub fn decode_json<T: WireMessage>(input: &str) -> SharedResult<T> {
    let header: Header = serde_json::from_str(input).map_err(|e| SharedError::DeserializationError {
        message: e.to_string(),
    })?;
    header.check::<T>()?;

    let envelope: Envelope<T> = serde_json::from_str(input).map_err(|e| SharedError::DeserializationError {
        message: e.to_string(),
    })?;
    Ok(envelope.payload)
}

pub fn encode_binary<T: WireMessage>(payload: &T) -> SharedResult<Vec<u8>> {
    let envelope = Envelope {
        version: CODEC_VERSION,
        kind: T::KIND.to_string(),
        payload,
    };
    bincode::serialize(&envelope).map_err(|e| SharedError::SerializationError {
        message: e.to_string(),
    })
}

pub fn decode_binary<T: WireMessage>(input: &[u8]) -> SharedResult<T> {
    // Header is a prefix of the envelope layout; trailing payload bytes are ignored here
    let header: Header = bincode::deserialize(input).map_err(|e| SharedError::DeserializationError {
        message: e.to_string(),
    })?;
    header.check::<T>()?;

    let envelope: Envelope<T> = bincode::deserialize(input).map_err(|e| SharedError::DeserializationError {
        message: e.to_string(),
    })?;
    Ok(envelope.payload)
}
