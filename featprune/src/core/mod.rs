//! Core business logic modules
//!
//! This module contains pure business logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod fingerprint;
pub mod history;
pub mod pruner;
pub mod state;

pub use fingerprint::Fingerprint;
pub use history::HistoryAccumulator;
pub use pruner::Pruner;
pub use state::EliminationState;
