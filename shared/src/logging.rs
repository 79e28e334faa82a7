//! Shared logging utilities for consistent tracing across elimination runs

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Default filter directives for the workspace crates at a given level
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("featprune={base_level},shared={base_level}")
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG` wins over the computed directives when it is set. Calling this
/// more than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(log_level)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for round-aware info logging
#[macro_export]
macro_rules! round_info {
    ($round:expr, $($arg:tt)*) => {
        tracing::info!(
            round = $round,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for round-aware warning logging
#[macro_export]
macro_rules! round_warn {
    ($round:expr, $($arg:tt)*) => {
        tracing::warn!(
            round = $round,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for round-aware error logging
#[macro_export]
macro_rules! round_error {
    ($round:expr, $($arg:tt)*) => {
        tracing::error!(
            round = $round,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for round-aware debug logging
#[macro_export]
macro_rules! round_debug {
    ($round:expr, $($arg:tt)*) => {
        tracing::debug!(
            round = $round,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}

/// Contextual logging helper for progress updates
pub fn log_progress(action: &str, details: &str) {
    info!(timestamp = format_timestamp(), "📋 {}: {}", action, details);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(None), "featprune=info,shared=info");
        assert_eq!(filter_directives(Some("debug")), "featprune=debug,shared=debug");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(Some("debug"));
        init_tracing(None);
        crate::round_debug!(0usize, "tracing initialised");
    }
}
