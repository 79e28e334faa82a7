//! Versioned wire contract for elimination results
//!
//! In-process runs pass values directly. When results have to cross a
//! process boundary (remote workers, cached reports) they travel inside an
//! `Envelope` tagged with the codec version and the payload kind:
//! - `codec`: envelope type plus JSON and binary encode/decode

pub mod codec;

pub use codec::{
    decode_binary, decode_json, encode_binary, encode_json, Envelope, WireMessage, CODEC_VERSION,
};
