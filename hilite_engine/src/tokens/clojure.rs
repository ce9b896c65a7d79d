//! Token kinds for the Clojure-family lexer

use crate::grammar::keywords::clojure;
use crate::tokens::token::{TokenCategory, TokenClass};
use serde::{Deserialize, Serialize};

/// Closed set of lexical categories for the Clojure-family language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClojureTokenKind {
    // Structural delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // Literals
    String,
    Number,
    Character,
    Boolean,
    Nil,

    // Names
    /// Colon-prefixed keyword literal (`:name`)
    Keyword,
    Symbol,
    SpecialForm,

    // Reader macros
    Quote,
    Deref,
    Metadata,
    SyntaxQuote,
    Unquote,
    UnquoteSplicing,
    /// `#` dispatch with optional classifying character (`#{`, `#(`, `#_`, ...)
    Dispatch,

    // Trivia and terminals
    Whitespace,
    Comment,
    Unknown,
    Eof,
}

impl TokenCategory for ClojureTokenKind {
    fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::LeftParen => "left_paren",
            Self::RightParen => "right_paren",
            Self::LeftBracket => "left_bracket",
            Self::RightBracket => "right_bracket",
            Self::LeftBrace => "left_brace",
            Self::RightBrace => "right_brace",
            Self::String => "string",
            Self::Number => "number",
            Self::Character => "character",
            Self::Boolean => "boolean",
            Self::Nil => "nil",
            Self::Keyword => "keyword",
            Self::Symbol => "symbol",
            Self::SpecialForm => "special_form",
            Self::Quote => "quote",
            Self::Deref => "deref",
            Self::Metadata => "metadata",
            Self::SyntaxQuote => "syntax_quote",
            Self::Unquote => "unquote",
            Self::UnquoteSplicing => "unquote_splicing",
            Self::Dispatch => "dispatch",
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
            Self::Eof => "eof",
        }
    }

    fn class(&self) -> TokenClass {
        match self {
            Self::SpecialForm => TokenClass::Structural,
            Self::String | Self::Number | Self::Character | Self::Boolean | Self::Nil => {
                TokenClass::Literal
            }
            Self::Symbol | Self::Keyword => TokenClass::Identifier,
            Self::LeftParen
            | Self::RightParen
            | Self::LeftBracket
            | Self::RightBracket
            | Self::LeftBrace
            | Self::RightBrace => TokenClass::Punctuation,
            Self::Quote
            | Self::Deref
            | Self::Metadata
            | Self::SyntaxQuote
            | Self::Unquote
            | Self::UnquoteSplicing
            | Self::Dispatch => TokenClass::Operator,
            Self::Whitespace => TokenClass::Whitespace,
            Self::Comment | Self::Unknown | Self::Eof => TokenClass::Special,
        }
    }
}

impl ClojureTokenKind {
    /// Whether this kind is one of the reader-macro prefixes
    pub fn is_reader_macro(self) -> bool {
        matches!(
            self,
            Self::Quote
                | Self::Deref
                | Self::Metadata
                | Self::SyntaxQuote
                | Self::Unquote
                | Self::UnquoteSplicing
                | Self::Dispatch
        )
    }
}

/// Classify a symbol-charset word: boolean and nil literals first, then the
/// special-form table, otherwise a plain symbol
pub fn classify_symbol(word: &str) -> ClojureTokenKind {
    match word {
        "true" | "false" => ClojureTokenKind::Boolean,
        "nil" => ClojureTokenKind::Nil,
        _ if clojure::is_special_form(word) => ClojureTokenKind::SpecialForm,
        _ => ClojureTokenKind::Symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_symbol() {
        assert_eq!(classify_symbol("true"), ClojureTokenKind::Boolean);
        assert_eq!(classify_symbol("nil"), ClojureTokenKind::Nil);
        assert_eq!(classify_symbol("defn"), ClojureTokenKind::SpecialForm);
        assert_eq!(classify_symbol("->>"), ClojureTokenKind::SpecialForm);
        assert_eq!(classify_symbol("my-fn"), ClojureTokenKind::Symbol);
    }

    #[test]
    fn test_trivia_classification() {
        assert!(ClojureTokenKind::Whitespace.is_trivia());
        assert!(ClojureTokenKind::Comment.is_trivia());
        assert!(!ClojureTokenKind::Symbol.is_trivia());
        assert!(ClojureTokenKind::Eof.is_eof());
    }
}
