// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Preferences for the highlight pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightPreferences {
    /// Whether to collect detailed token metrics during lexing
    pub collect_detailed_metrics: bool,

    /// Whether to include whitespace and comments in token counts
    pub include_trivia_in_counts: bool,

    /// Whether to log per-stage timing information
    pub log_stage_timings: bool,

    /// Whether parser recoveries are logged as warnings
    pub log_recovery_warnings: bool,
}

impl Default for HighlightPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env::var("HILITE_DETAILED_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_trivia_in_counts: env::var("HILITE_INCLUDE_TRIVIA_COUNTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_stage_timings: env::var("HILITE_LOG_STAGE_TIMINGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_recovery_warnings: env::var("HILITE_LOG_RECOVERY_WARNINGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Preferences for the logging subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum log level: "error", "warn", "info", or "debug"
    pub min_log_level: String,

    /// Whether to emit one JSON object per log line
    pub use_structured_logging: bool,

    /// Whether to log per-stage performance events
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("HILITE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            use_structured_logging: env::var("HILITE_STRUCTURED_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_performance_events: env::var("HILITE_LOG_PERFORMANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Combined runtime preference file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimePreferences {
    #[serde(default)]
    pub highlight: HighlightPreferences,
    #[serde(default)]
    pub logging: LoggingPreferences,
}

impl RuntimePreferences {
    /// Parse preferences from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Invalid preferences file: {}", e))
    }

    /// Load preferences from a TOML file on disk
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read preferences file {}: {}", path.display(), e))?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_preferences() {
        let prefs = HighlightPreferences::default();
        assert!(prefs.collect_detailed_metrics);

        let logging = LoggingPreferences::default();
        assert!(!logging.min_log_level.is_empty());
    }

    #[test]
    fn test_preferences_from_toml_str() {
        let prefs = RuntimePreferences::from_toml_str(
            r#"
            [highlight]
            collect_detailed_metrics = false
            include_trivia_in_counts = true
            log_stage_timings = false
            log_recovery_warnings = false

            [logging]
            min_log_level = "debug"
            use_structured_logging = true
            log_performance_events = false
            "#,
        )
        .unwrap();

        assert!(!prefs.highlight.collect_detailed_metrics);
        assert!(prefs.highlight.include_trivia_in_counts);
        assert_eq!(prefs.logging.min_log_level, "debug");
        assert!(prefs.logging.use_structured_logging);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let prefs = RuntimePreferences::from_toml_str(
            r#"
            [logging]
            min_log_level = "warn"
            use_structured_logging = false
            log_performance_events = true
            "#,
        )
        .unwrap();

        assert_eq!(prefs.logging.min_log_level, "warn");
        // Highlight section absent: defaults apply
        assert!(prefs.highlight.collect_detailed_metrics);
    }

    #[test]
    fn test_preferences_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nmin_log_level = \"error\"\nuse_structured_logging = true\nlog_performance_events = false"
        )
        .unwrap();

        let prefs = RuntimePreferences::from_toml_file(file.path()).unwrap();
        assert_eq!(prefs.logging.min_log_level, "error");
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = RuntimePreferences::from_toml_str("not [ valid toml");
        assert!(result.is_err());
    }
}
