// Internal modules
pub mod config;
pub mod grammar;
pub mod highlight;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use highlight::{HighlightedToken, Style};
pub use pipeline::{
    highlight_clojure, highlight_csharp, highlight_fortran, Language, PipelineError,
    PipelineOutput,
};
