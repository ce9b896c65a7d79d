//! Token kinds for the C-family lexer

use crate::grammar::keywords::csharp;
use crate::tokens::token::{TokenCategory, TokenClass};
use serde::{Deserialize, Serialize};

/// Closed set of lexical categories for the C-family language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CSharpTokenKind {
    Keyword,
    Identifier,

    // Literals
    String,
    Number,
    Character,
    Boolean,
    Null,

    Operator,

    // Delimiters and punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,

    // Trivia and terminals
    Whitespace,
    Comment,
    /// `#` to end of line
    Preprocessor,
    /// Bracketed attribute run (`[Attr(...)]`)
    Attribute,
    Unknown,
    Eof,
}

impl TokenCategory for CSharpTokenKind {
    fn is_trivia(&self) -> bool {
        // Preprocessor lines are syntactically invisible to the parser;
        // attributes are not (they parse as members)
        matches!(self, Self::Whitespace | Self::Comment | Self::Preprocessor)
    }

    fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Number => "number",
            Self::Character => "character",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Operator => "operator",
            Self::LeftParen => "left_paren",
            Self::RightParen => "right_paren",
            Self::LeftBrace => "left_brace",
            Self::RightBrace => "right_brace",
            Self::LeftBracket => "left_bracket",
            Self::RightBracket => "right_bracket",
            Self::Semicolon => "semicolon",
            Self::Comma => "comma",
            Self::Dot => "dot",
            Self::Colon => "colon",
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Preprocessor => "preprocessor",
            Self::Attribute => "attribute",
            Self::Unknown => "unknown",
            Self::Eof => "eof",
        }
    }

    fn class(&self) -> TokenClass {
        match self {
            Self::Keyword => TokenClass::Structural,
            Self::String | Self::Number | Self::Character | Self::Boolean | Self::Null => {
                TokenClass::Literal
            }
            Self::Identifier => TokenClass::Identifier,
            Self::Operator => TokenClass::Operator,
            Self::LeftParen
            | Self::RightParen
            | Self::LeftBrace
            | Self::RightBrace
            | Self::LeftBracket
            | Self::RightBracket
            | Self::Semicolon
            | Self::Comma
            | Self::Dot
            | Self::Colon => TokenClass::Punctuation,
            Self::Whitespace => TokenClass::Whitespace,
            Self::Comment | Self::Preprocessor | Self::Attribute | Self::Unknown | Self::Eof => {
                TokenClass::Special
            }
        }
    }
}

/// Classify an identifier run. The token keeps any leading `@` in its text;
/// classification strips it and matches the reserved-word table
/// case-sensitively.
pub fn classify_word(word: &str) -> CSharpTokenKind {
    let normalized = word.trim_start_matches('@');
    match normalized {
        "true" | "false" => CSharpTokenKind::Boolean,
        "null" => CSharpTokenKind::Null,
        _ if csharp::is_keyword(normalized) => CSharpTokenKind::Keyword,
        _ => CSharpTokenKind::Identifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("class"), CSharpTokenKind::Keyword);
        assert_eq!(classify_word("true"), CSharpTokenKind::Boolean);
        assert_eq!(classify_word("null"), CSharpTokenKind::Null);
        assert_eq!(classify_word("Console"), CSharpTokenKind::Identifier);
        // Case-sensitive: "Class" is not reserved
        assert_eq!(classify_word("Class"), CSharpTokenKind::Identifier);
    }

    #[test]
    fn test_verbatim_identifier_prefix() {
        assert_eq!(classify_word("@class"), CSharpTokenKind::Keyword);
        assert_eq!(classify_word("@value"), CSharpTokenKind::Keyword);
        assert_eq!(classify_word("@myName"), CSharpTokenKind::Identifier);
    }

    #[test]
    fn test_preprocessor_is_trivia_attribute_is_not() {
        assert!(CSharpTokenKind::Preprocessor.is_trivia());
        assert!(!CSharpTokenKind::Attribute.is_trivia());
    }
}
