//! Syntax analysis module
//!
//! One recursive-descent parser per source language, all sharing the same
//! discipline: dispatch by leading token, bounded lookahead through stream
//! checkpoints, guaranteed forward progress on malformed input, and
//! skip-to-boundary recovery instead of failure. Parsers return a forest of
//! top-level nodes; they never reject input.

pub mod clojure;
pub mod csharp;
pub mod fortran;

pub use clojure::ClojureParser;
pub use csharp::CSharpParser;
pub use fortran::FortranParser;

/// Counters recorded during one parse run
#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    /// Top-level and nested nodes constructed
    pub nodes_built: usize,
    /// Tokens skipped because no production claimed them
    pub tokens_skipped: usize,
    /// Skip-to-boundary recoveries performed
    pub recoveries: usize,
    /// Times the recursion depth limit stopped a descent
    pub depth_limit_hits: usize,
}
