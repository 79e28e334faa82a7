//! Shared types for parallel backward feature elimination
//!
//! Contains the data model exchanged between the orchestrator, fan-out
//! tasks and reporting collaborators, plus logging helpers and the
//! versioned wire codec.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{decode_binary, decode_json, encode_binary, encode_json, Envelope, WireMessage};
