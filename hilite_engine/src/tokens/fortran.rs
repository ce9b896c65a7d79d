//! Token kinds for the Fortran-family lexer

use crate::grammar::keywords::FortranKeyword;
use crate::tokens::token::{TokenCategory, TokenClass};
use serde::{Deserialize, Serialize};

/// Closed set of lexical categories for the Fortran-family language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FortranTokenKind {
    /// Reserved word (classification is case-insensitive)
    Keyword(FortranKeyword),
    Identifier,

    // Literals
    Integer,
    Real,
    String,
    Logical,
    /// Numeric statement label in columns 1-6
    Label,

    // Delimiters and punctuation
    LeftParen,
    RightParen,
    Comma,
    Colon,
    DoubleColon,

    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    Assignment,
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,

    // Trivia and terminals
    Whitespace,
    Comment,
    Unknown,
    Eof,
}

impl TokenCategory for FortranTokenKind {
    fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Identifier => "identifier",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Logical => "logical",
            Self::Label => "label",
            Self::LeftParen => "left_paren",
            Self::RightParen => "right_paren",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::DoubleColon => "double_colon",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Assignment => "assignment",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::LessThan => "less_than",
            Self::LessOrEqual => "less_or_equal",
            Self::GreaterThan => "greater_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
            Self::Eof => "eof",
        }
    }

    fn class(&self) -> TokenClass {
        match self {
            Self::Keyword(_) => TokenClass::Structural,
            Self::Integer | Self::Real | Self::String | Self::Logical | Self::Label => {
                TokenClass::Literal
            }
            Self::Identifier => TokenClass::Identifier,
            Self::LeftParen | Self::RightParen | Self::Comma | Self::Colon | Self::DoubleColon => {
                TokenClass::Punctuation
            }
            Self::Plus
            | Self::Minus
            | Self::Multiply
            | Self::Divide
            | Self::Power
            | Self::Assignment
            | Self::Equals
            | Self::NotEquals
            | Self::LessThan
            | Self::LessOrEqual
            | Self::GreaterThan
            | Self::GreaterOrEqual => TokenClass::Operator,
            Self::Whitespace => TokenClass::Whitespace,
            Self::Comment | Self::Unknown | Self::Eof => TokenClass::Special,
        }
    }
}

impl FortranTokenKind {
    /// Get the keyword if this token is a keyword
    pub fn as_keyword(self) -> Option<FortranKeyword> {
        match self {
            Self::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Check against a specific keyword
    pub fn is_keyword(self, keyword: FortranKeyword) -> bool {
        matches!(self, Self::Keyword(kw) if kw == keyword)
    }
}

/// Classify an identifier run: `.true.`-style logical literals and the
/// case-insensitive keyword table, otherwise a plain identifier
pub fn classify_word(word: &str) -> FortranTokenKind {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "true" | "false" => FortranTokenKind::Logical,
        _ => match FortranKeyword::from_str(word) {
            Some(kw) => FortranTokenKind::Keyword(kw),
            None => FortranTokenKind::Identifier,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word_case_insensitive() {
        assert_eq!(
            classify_word("PROGRAM"),
            FortranTokenKind::Keyword(FortranKeyword::Program)
        );
        assert_eq!(
            classify_word("Program"),
            FortranTokenKind::Keyword(FortranKeyword::Program)
        );
        assert_eq!(
            classify_word("program"),
            FortranTokenKind::Keyword(FortranKeyword::Program)
        );
    }

    #[test]
    fn test_classify_word_literals_and_identifiers() {
        assert_eq!(classify_word("TRUE"), FortranTokenKind::Logical);
        assert_eq!(classify_word("false"), FortranTokenKind::Logical);
        assert_eq!(classify_word("counter"), FortranTokenKind::Identifier);
    }

    #[test]
    fn test_keyword_accessor() {
        let kind = classify_word("call");
        assert_eq!(kind.as_keyword(), Some(FortranKeyword::Call));
        assert!(kind.is_keyword(FortranKeyword::Call));
        assert!(!kind.is_keyword(FortranKeyword::Return));
    }
}
