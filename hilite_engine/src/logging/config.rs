//! Configuration access for logging
//!
//! Runtime preferences are stored once per process; defaults come from
//! environment variables via `config::runtime::LoggingPreferences`.

use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime logging preferences
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Get minimum log level from user preference
pub fn get_min_log_level() -> LogLevel {
    match get_runtime_preferences().min_log_level.as_str() {
        "error" => LogLevel::Error,
        "warn" | "warning" => LogLevel::Warning,
        "debug" => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// Check if structured (JSON) logging is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Check if per-stage performance events should be logged
pub fn log_performance_events() -> bool {
    get_runtime_preferences().log_performance_events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_level() {
        // Unless preferences were initialized by another test, defaults apply
        let level = get_min_log_level();
        assert!(level <= LogLevel::Debug);
    }
}
