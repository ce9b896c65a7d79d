//! Pipeline façade
//!
//! One request flows lexer -> parser -> highlight resolver, with every
//! stage instance scoped to the call: no tokenizer, parser, or resolver
//! state is shared across requests, so concurrent calls need no locking.
//! The façade enforces the inbound caller contract (length bounds) and
//! routes to the per-language core; the cores themselves never fail.

pub mod error;
pub mod output;

pub use error::PipelineError;
pub use output::{OutputToken, PipelineOutput};

use crate::config::constants::compile_time;
use crate::highlight::{self, HighlightedToken};
use crate::lexical::{CSharpLexer, ClojureLexer, FortranLexer};
use crate::logging::codes;
use crate::syntax::{CSharpParser, ClojureParser, FortranParser};
use crate::tokens::{CSharpTokenKind, ClojureTokenKind, FortranTokenKind};
use crate::{log_error, log_info, log_success};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Source languages the engine can route to. Routing a request here is the
/// external layer's concern; this enum is the seam it calls through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Clojure,
    Fortran,
    CSharp,
}

impl Language {
    /// Resolve a language from a request-supplied name or file extension
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "clojure" | "clj" | "cljs" | "edn" => Some(Self::Clojure),
            "fortran" | "f" | "f77" | "f90" | "f95" | "for" => Some(Self::Fortran),
            "csharp" | "cs" | "c#" => Some(Self::CSharp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clojure => "clojure",
            Self::Fortran => "fortran",
            Self::CSharp => "csharp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Highlight Clojure-family source. Core entry point: accepts any string
/// and always returns a fully covering annotated stream.
pub fn highlight_clojure(source: &str) -> Vec<HighlightedToken<ClojureTokenKind>> {
    let tokens = ClojureLexer::new().tokenize(source);
    let mut parser = ClojureParser::new(tokens);
    let forest = parser.parse();
    let tokens = parser.into_tokens();
    highlight::clojure::resolve(&forest, tokens)
}

/// Highlight Fortran-family source
pub fn highlight_fortran(source: &str) -> Vec<HighlightedToken<FortranTokenKind>> {
    let tokens = FortranLexer::new().tokenize(source);
    let mut parser = FortranParser::new(tokens);
    let forest = parser.parse();
    let tokens = parser.into_tokens();
    highlight::fortran::resolve(&forest, tokens)
}

/// Highlight C-family source
pub fn highlight_csharp(source: &str) -> Vec<HighlightedToken<CSharpTokenKind>> {
    let tokens = CSharpLexer::new().tokenize(source);
    let mut parser = CSharpParser::new(tokens);
    let forest = parser.parse();
    let tokens = parser.into_tokens();
    highlight::csharp::resolve(&forest, tokens)
}

/// Route one request through the matching pipeline and wrap the stream in
/// the response envelope
pub fn run(source: &str, language: Language) -> Result<PipelineOutput, PipelineError> {
    let start_time = Instant::now();

    validate_request(source)?;

    log_info!("Starting highlight pipeline",
        "language" => language,
        "bytes" => source.len()
    );

    let output = match language {
        Language::Clojure => PipelineOutput::new(language.as_str(), highlight_clojure(source)),
        Language::Fortran => PipelineOutput::new(language.as_str(), highlight_fortran(source)),
        Language::CSharp => PipelineOutput::new(language.as_str(), highlight_csharp(source)),
    };

    log_success!(codes::success::PIPELINE_COMPLETE,
        "Highlight pipeline completed",
        "language" => language,
        "tokens" => output.token_count,
        "duration_ms" => start_time.elapsed().as_millis()
    );

    Ok(output)
}

/// Resolve the language by name, then run the pipeline
pub fn run_named(source: &str, language_name: &str) -> Result<PipelineOutput, PipelineError> {
    let language = Language::from_name(language_name).ok_or_else(|| {
        log_error!(codes::pipeline::UNSUPPORTED_LANGUAGE,
            "No pipeline registered for requested language",
            "requested" => language_name
        );
        PipelineError::UnsupportedLanguage {
            name: language_name.to_string(),
        }
    })?;
    run(source, language)
}

/// Inbound caller contract: character count above the minimum, byte size
/// below the ceiling
fn validate_request(source: &str) -> Result<(), PipelineError> {
    let char_count = source.chars().count();
    if char_count < compile_time::pipeline::MIN_SOURCE_LENGTH {
        log_error!(codes::pipeline::INPUT_TOO_SHORT,
            "Request rejected before pipeline start",
            "chars" => char_count
        );
        return Err(PipelineError::input_too_short(char_count));
    }
    if source.len() > compile_time::lexical::MAX_SOURCE_SIZE {
        return Err(PipelineError::input_too_large(source.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::palette;

    #[test]
    fn test_run_produces_envelope() {
        let output = run("(defn f [x] x)", Language::Clojure).unwrap();
        assert_eq!(output.language, "clojure");
        assert_eq!(output.token_count, output.tokens.len());
        assert!(output.token_count > 0);
    }

    #[test]
    fn test_minimum_length_contract() {
        let result = run("(x)", Language::Clojure);
        assert!(matches!(
            result,
            Err(PipelineError::InputTooShort { length: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let result = run_named("(defn f [x] x)", "cobol");
        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_language_name_aliases() {
        assert_eq!(Language::from_name("CLJ"), Some(Language::Clojure));
        assert_eq!(Language::from_name("f90"), Some(Language::Fortran));
        assert_eq!(Language::from_name("c#"), Some(Language::CSharp));
        assert_eq!(Language::from_name("lisp"), None);
    }

    #[test]
    fn test_coverage_one_entry_per_non_eof_token() {
        let source = "program p\n  integer :: i\n  i = 1\nend";
        let lexed = crate::lexical::FortranLexer::new().tokenize(source).len();
        let stream = highlight_fortran(source);
        assert_eq!(stream.len(), lexed - 1);
    }

    #[test]
    fn test_determinism() {
        let source = "class C {\nvoid M() {\nFoo bar;\nbar();\n}\n}\n";
        let first = highlight_csharp(source);
        let second = highlight_csharp(source);
        assert_eq!(first, second);
    }

    #[test]
    fn test_offsets_strictly_increase_and_match_lexing() {
        let source = "(let [a 1] (+ a 2)) ; tail";
        let tokens = crate::lexical::ClojureLexer::new().tokenize(source);
        let stream = highlight_clojure(source);

        for (entry, token) in stream.iter().zip(tokens.iter()) {
            assert_eq!(entry.token.offset(), token.offset());
            assert_eq!(entry.token.text, token.text);
        }
    }

    #[test]
    fn test_unterminated_string_full_stream() {
        let source = "(def message \"no closing quote";
        let output = run(source, Language::Clojure).unwrap();

        let string_entry = output
            .tokens
            .iter()
            .find(|t| t.category == "string")
            .expect("string token");
        assert_eq!(string_entry.text, "\"no closing quote");
        assert_eq!(string_entry.color, palette::DARK_GREEN);
    }

    #[test]
    fn test_declaration_vs_call_disambiguation() {
        let declaration = run("class C {\nvoid M() {\nFoo bar;\n}\n}", Language::CSharp).unwrap();
        let foo = declaration
            .tokens
            .iter()
            .find(|t| t.text == "Foo")
            .expect("type token");
        assert_eq!(foo.color, palette::BLUE);

        let call = run("class C {\nvoid M() {\nbar();\n}\n}", Language::CSharp).unwrap();
        let bar = call.tokens.iter().find(|t| t.text == "bar").expect("callee");
        assert_eq!(bar.color, palette::YELLOW);
    }

    #[test]
    fn test_fortran_case_insensitive_scenario() {
        let upper = run("PROGRAM DEMO\nEND PROGRAM", Language::Fortran).unwrap();
        let lower = run("program demo\nend program", Language::Fortran).unwrap();

        let colors = |output: &PipelineOutput| -> Vec<(String, String, bool)> {
            output
                .tokens
                .iter()
                .map(|t| (t.category.clone(), t.color.clone(), t.bold))
                .collect()
        };
        assert_eq!(colors(&upper), colors(&lower));
    }

    #[test]
    fn test_recovered_region_uses_lexical_fallback() {
        // The `|||` run cannot be classified; its tokens must take the
        // fallback color for their category, not an error path
        let source = "(def a 1) ||| (def b 2)";
        let output = run(source, Language::Clojure).unwrap();

        let unknown: Vec<_> = output
            .tokens
            .iter()
            .filter(|t| t.category == "unknown")
            .collect();
        assert_eq!(unknown.len(), 3);
        for entry in unknown {
            assert_eq!(entry.color, palette::BLACK);
            assert!(!entry.bold);
        }
        let names: Vec<_> = output
            .tokens
            .iter()
            .filter(|t| t.bold && t.color == palette::DARK_BLUE)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
