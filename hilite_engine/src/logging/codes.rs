//! Consolidated event codes and classification system
//!
//! Single source of truth for all event codes, their metadata, and
//! classification functions. Codes are grouped by pipeline stage so log
//! output can be filtered per stage.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an event code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const UNKNOWN_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E022");
}

/// Syntax analysis codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E030");
    pub const UNMATCHED_DELIMITER: Code = Code::new("E031");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E032");
    pub const STATEMENT_SKIPPED: Code = Code::new("E033");
}

/// Pipeline codes
pub mod pipeline {
    use super::Code;

    pub const UNSUPPORTED_LANGUAGE: Code = Code::new("E040");
    pub const INPUT_TOO_SHORT: Code = Code::new("E041");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I002");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I003");
    pub const HIGHLIGHT_RESOLUTION_COMPLETE: Code = Code::new("I004");
    pub const PIPELINE_COMPLETE: Code = Code::new("I005");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static METADATA: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn metadata_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    METADATA.get_or_init(|| {
        let entries = [
            CodeMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Internal engine error",
            },
            CodeMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                description: "Global subsystem initialization failed",
            },
            CodeMetadata {
                code: "E020",
                category: "Lexical",
                severity: Severity::Low,
                recoverable: true,
                description: "Unrecognized character emitted as unknown token",
            },
            CodeMetadata {
                code: "E021",
                category: "Lexical",
                severity: Severity::Low,
                recoverable: true,
                description: "String literal not terminated before end of input",
            },
            CodeMetadata {
                code: "E022",
                category: "Lexical",
                severity: Severity::Low,
                recoverable: true,
                description: "Block comment not terminated before end of input",
            },
            CodeMetadata {
                code: "E030",
                category: "Syntax",
                severity: Severity::Medium,
                recoverable: true,
                description: "Token did not match any known production",
            },
            CodeMetadata {
                code: "E031",
                category: "Syntax",
                severity: Severity::Medium,
                recoverable: true,
                description: "Closing delimiter missing; span truncated",
            },
            CodeMetadata {
                code: "E032",
                category: "Syntax",
                severity: Severity::High,
                recoverable: true,
                description: "Parser recursion depth limit reached",
            },
            CodeMetadata {
                code: "E033",
                category: "Syntax",
                severity: Severity::Low,
                recoverable: true,
                description: "Unclassifiable statement skipped to next boundary",
            },
            CodeMetadata {
                code: "E040",
                category: "Pipeline",
                severity: Severity::High,
                recoverable: false,
                description: "Requested language has no registered pipeline",
            },
            CodeMetadata {
                code: "E041",
                category: "Pipeline",
                severity: Severity::Medium,
                recoverable: false,
                description: "Source payload below minimum length threshold",
            },
        ];

        entries.into_iter().map(|m| (m.code, m)).collect()
    })
}

/// Get severity for a code (defaults to Medium for unregistered codes)
pub fn get_severity(code: &str) -> Severity {
    metadata_registry()
        .get(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    metadata_registry()
        .get(code)
        .map(|m| m.category)
        .unwrap_or("Unknown")
}

/// Get description for a code
pub fn get_description(code: &str) -> &'static str {
    metadata_registry()
        .get(code)
        .map(|m| m.description)
        .unwrap_or("Unknown event")
}

/// Check if an error with this code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    metadata_registry()
        .get(code)
        .map(|m| m.recoverable)
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(lexical::UNTERMINATED_STRING.as_str(), "E021");
        assert_eq!(format!("{}", syntax::UNEXPECTED_TOKEN), "E030");
    }

    #[test]
    fn test_metadata_lookup() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(is_recoverable("E033"));
        assert!(!is_recoverable("E040"));
    }

    #[test]
    fn test_unregistered_code_defaults() {
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_description("Z999"), "Unknown event");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }
}
