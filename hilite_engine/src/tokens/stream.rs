//! Trivia-filtered token stream with checkpoint support
//!
//! Parsers navigate significant tokens only, but the stream keeps every
//! token (including whitespace and comments) so the original input can be
//! reconstructed and the resolver can color trivia by lexical fallback.
//! Checkpoints make bounded lookahead side-effect free: save, probe,
//! restore.

use crate::tokens::token::{Token, TokenCategory};
use crate::utils::Span;

/// Token stream over significant (non-trivia) tokens that retains the full
/// token list with original spans.
#[derive(Debug, Clone)]
pub struct TokenStream<K> {
    /// All tokens (including whitespace and comments) with original spans
    all_tokens: Vec<Token<K>>,
    /// Indices into all_tokens for significant (non-trivia) tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
}

impl<K: TokenCategory> TokenStream<K> {
    /// Create a new token stream with automatic trivia filtering
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_trivia())
            .map(|(i, _)| i)
            .collect();

        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
        }
    }

    // === CORE NAVIGATION ===

    /// Get the current significant token
    pub fn current(&self) -> Option<&Token<K>> {
        self.significant_indices
            .get(self.position)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Get the current token kind
    pub fn current_kind(&self) -> Option<K> {
        self.current().map(|t| t.kind)
    }

    /// Get the span of the current token
    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|t| t.span)
    }

    /// Peek at the next significant token without advancing
    pub fn peek(&self) -> Option<&Token<K>> {
        self.peek_ahead(1)
    }

    /// Peek ahead by n positions in significant tokens
    pub fn peek_ahead(&self, n: usize) -> Option<&Token<K>> {
        self.significant_indices
            .get(self.position + n)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Advance to the next significant token
    pub fn advance(&mut self) {
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
    }

    /// Check if the cursor has run past the last significant token
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.significant_indices.len()
    }

    /// Check if parsing should stop: cursor exhausted or at the EOF token
    pub fn is_at_end(&self) -> bool {
        match self.current() {
            Some(token) => token.is_eof(),
            None => true,
        }
    }

    /// Get the number of significant tokens
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    /// Check if the stream has no significant tokens
    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    /// Span of the most recently consumed significant token. Used as the
    /// end-position fallback when a closing delimiter is never found.
    pub fn previous_span(&self) -> Option<Span> {
        if self.position == 0 {
            return None;
        }
        self.significant_indices
            .get(self.position - 1)
            .and_then(|&original_index| self.all_tokens.get(original_index))
            .map(|t| t.span)
    }

    // === CHECKPOINTS ===

    /// Save current position as checkpoint for bounded lookahead
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore position from checkpoint
    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.significant_indices.len());
    }

    // === DIAGNOSTICS ===

    /// Get current position in significant tokens
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining significant token count
    pub fn remaining_count(&self) -> usize {
        self.significant_indices.len().saturating_sub(self.position)
    }

    /// Get all tokens (including trivia) with spans
    pub fn all_tokens(&self) -> &[Token<K>] {
        &self.all_tokens
    }

    /// Consume the stream, returning the full token list
    pub fn into_tokens(self) -> Vec<Token<K>> {
        self.all_tokens
    }

    /// Whether the stream's last significant token is EOF
    pub fn has_eof(&self) -> bool {
        self.significant_indices
            .last()
            .and_then(|&idx| self.all_tokens.get(idx))
            .map(|t| t.is_eof())
            .unwrap_or(false)
    }
}

/// Validation helpers for stream invariants
pub mod validation {
    use super::*;

    /// Validate that spans are monotonically increasing
    pub fn validate_span_order<K: TokenCategory>(tokens: &[Token<K>]) -> Result<(), String> {
        for window in tokens.windows(2) {
            let current = window[0].span;
            let next = window[1].span;

            if current.end.offset > next.start.offset {
                return Err(format!(
                    "Span order violation: token ending at {} starts after next token at {}",
                    current.end.offset, next.start.offset
                ));
            }
        }
        Ok(())
    }

    /// Validate that a stream ends with exactly one EOF token
    pub fn validate_eof_terminated<K: TokenCategory>(tokens: &[Token<K>]) -> Result<(), String> {
        let eof_count = tokens.iter().filter(|t| t.is_eof()).count();
        if eof_count != 1 {
            return Err(format!("Expected exactly one EOF token, found {}", eof_count));
        }
        if !tokens.last().map(|t| t.is_eof()).unwrap_or(false) {
            return Err("EOF token is not the final token".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::token::TokenClass;
    use crate::utils::{Position, Span};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestKind {
        Word,
        Space,
        Eof,
    }

    impl TokenCategory for TestKind {
        fn is_trivia(&self) -> bool {
            matches!(self, TestKind::Space)
        }

        fn is_eof(&self) -> bool {
            matches!(self, TestKind::Eof)
        }

        fn name(&self) -> &'static str {
            match self {
                TestKind::Word => "word",
                TestKind::Space => "whitespace",
                TestKind::Eof => "eof",
            }
        }

        fn class(&self) -> TokenClass {
            match self {
                TestKind::Word => TokenClass::Identifier,
                TestKind::Space => TokenClass::Whitespace,
                TestKind::Eof => TokenClass::Special,
            }
        }
    }

    fn token(kind: TestKind, text: &str, offset: usize) -> Token<TestKind> {
        let start = Position::new(offset, 1, offset as u32 + 1);
        let end = Position::new(offset + text.len(), 1, (offset + text.len()) as u32 + 1);
        Token::new(kind, text, Span::new(start, end))
    }

    fn sample_stream() -> TokenStream<TestKind> {
        TokenStream::new(vec![
            token(TestKind::Word, "a", 0),
            token(TestKind::Space, " ", 1),
            token(TestKind::Word, "b", 2),
            token(TestKind::Eof, "", 3),
        ])
    }

    #[test]
    fn test_trivia_is_filtered() {
        let stream = sample_stream();
        assert_eq!(stream.len(), 3); // a, b, EOF
        assert_eq!(stream.all_tokens().len(), 4);
        assert_eq!(stream.current().unwrap().text, "a");
    }

    #[test]
    fn test_advance_and_end_detection() {
        let mut stream = sample_stream();
        assert!(!stream.is_at_end());
        stream.advance();
        assert_eq!(stream.current().unwrap().text, "b");
        stream.advance();
        // Now at EOF token: parsing should stop, but cursor is not exhausted
        assert!(stream.is_at_end());
        assert!(!stream.is_exhausted());
        stream.advance();
        assert!(stream.is_exhausted());
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut stream = sample_stream();
        let checkpoint = stream.save_position();
        stream.advance();
        stream.advance();
        stream.restore_position(checkpoint);
        assert_eq!(stream.current().unwrap().text, "a");
    }

    #[test]
    fn test_peek_does_not_consume() {
        let stream = sample_stream();
        assert_eq!(stream.peek().unwrap().text, "b");
        assert_eq!(stream.current().unwrap().text, "a");
    }

    #[test]
    fn test_validation() {
        let stream = sample_stream();
        assert!(validation::validate_span_order(stream.all_tokens()).is_ok());
        assert!(validation::validate_eof_terminated(stream.all_tokens()).is_ok());

        let no_eof = vec![token(TestKind::Word, "a", 0)];
        assert!(validation::validate_eof_terminated(&no_eof).is_err());
    }
}
