//! Service implementations
//!
//! This module contains real implementations of the service traits:
//! result caches and reference trainers.

pub mod cache;
pub mod file_cache;
pub mod trainers;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use cache::{CacheStats, InMemoryCache};
pub use file_cache::FileCache;
pub use trainers::{ScoreTableTrainer, SeededRandomTrainer};
