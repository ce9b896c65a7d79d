//! Serialized response envelope
//!
//! Per-language token kinds are erased into their stable category names so
//! one envelope shape covers every pipeline. The caller serializes the
//! envelope as-is; the engine defines no transport framing.

use crate::highlight::HighlightedToken;
use crate::tokens::TokenCategory;
use serde::{Deserialize, Serialize};

/// One annotated token of the output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputToken {
    pub category: String,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
    pub color: String,
    pub bold: bool,
}

/// Response envelope for one highlight request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub language: String,
    pub token_count: usize,
    pub tokens: Vec<OutputToken>,
}

impl PipelineOutput {
    pub fn new<K: TokenCategory>(language: &str, stream: Vec<HighlightedToken<K>>) -> Self {
        let tokens: Vec<OutputToken> = stream
            .into_iter()
            .map(|entry| OutputToken {
                category: entry.token.kind.name().to_string(),
                text: entry.token.text.clone(),
                line: entry.token.line(),
                column: entry.token.column(),
                byte_offset: entry.token.offset(),
                color: entry.color.to_string(),
                bold: entry.bold,
            })
            .collect();

        Self {
            language: language.to_string(),
            token_count: tokens.len(),
            tokens,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{palette, Style};
    use crate::tokens::{ClojureTokenKind, Token};
    use crate::utils::{Position, Span};

    #[test]
    fn test_envelope_erases_token_kinds() {
        let token = Token::new(
            ClojureTokenKind::Symbol,
            "inc",
            Span::new(Position::new(0, 1, 1), Position::new(3, 1, 4)),
        );
        let style = Style::bold(palette::DARK_BLUE);
        let stream = vec![HighlightedToken {
            token,
            color: style.color,
            bold: style.bold,
        }];

        let output = PipelineOutput::new("clojure", stream);
        assert_eq!(output.token_count, 1);
        assert_eq!(output.tokens[0].category, "symbol");
        assert_eq!(output.tokens[0].color, "DarkBlue");
        assert!(output.tokens[0].bold);
        assert_eq!(output.tokens[0].byte_offset, 0);

        let json = output.to_json().unwrap();
        assert!(json.contains("\"language\": \"clojure\""));
    }
}
