//! Tokenizer for the Clojure-family language
//!
//! Symbol characters deliberately include the arithmetic and comparison
//! characters, so `->>` and `+` lex as single symbols. A `-` only begins a
//! number when the next character is a digit.

use crate::lexical::{Cursor, LexicalMetrics};
use crate::logging::codes;
use crate::tokens::clojure::{classify_symbol, ClojureTokenKind};
use crate::tokens::Token;
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};

const SYMBOL_START_EXTRAS: &str = "+-*/<>=!?$%&_";
const SYMBOL_CHAR_EXTRAS: &str = "+-*/<>=!?$%&_.:'#";

fn is_symbol_start(ch: char) -> bool {
    ch.is_alphabetic() || SYMBOL_START_EXTRAS.contains(ch)
}

fn is_symbol_char(ch: char) -> bool {
    ch.is_alphanumeric() || SYMBOL_CHAR_EXTRAS.contains(ch)
}

/// Tokenizer for Clojure-family source text
pub struct ClojureLexer {
    metrics: LexicalMetrics,
}

impl ClojureLexer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
        }
    }

    /// Get metrics from the most recent tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Convert source text into an EOF-terminated token list. Never fails:
    /// unrecognized characters become unknown tokens and unterminated
    /// literals run to end of input.
    pub fn tokenize(&mut self, source: &str) -> Vec<Token<ClojureTokenKind>> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting Clojure tokenization", "bytes" => source.len());

        let mut cursor = Cursor::new(source);
        let mut tokens = Vec::new();

        while !cursor.is_at_end() {
            let token = self.next_token(&mut cursor);
            self.metrics.record(&token);
            tokens.push(token);
        }

        tokens.push(Token::new(
            ClojureTokenKind::Eof,
            "",
            Span::empty(cursor.position()),
        ));

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Clojure tokenization completed",
            "tokens" => tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "comments" => self.metrics.comment_count,
            "unknown" => self.metrics.unknown_tokens
        );

        tokens
    }

    fn next_token(&mut self, cursor: &mut Cursor<'_>) -> Token<ClojureTokenKind> {
        let start = cursor.position();
        // Dispatch arms below always consume at least one character
        let current = match cursor.current() {
            Some(ch) => ch,
            None => return Token::new(ClojureTokenKind::Eof, "", Span::empty(start)),
        };

        match current {
            ch if ch.is_whitespace() => self.read_whitespace(cursor, start),
            ';' => self.read_comment(cursor, start),
            '"' => self.read_string(cursor, start),
            '\\' => self.read_character(cursor, start),
            ':' => self.read_keyword(cursor, start),

            '\'' => self.single(cursor, start, ClojureTokenKind::Quote),
            '@' => self.single(cursor, start, ClojureTokenKind::Deref),
            '^' => self.single(cursor, start, ClojureTokenKind::Metadata),
            '`' => self.single(cursor, start, ClojureTokenKind::SyntaxQuote),
            '~' => {
                cursor.bump();
                if cursor.current() == Some('@') {
                    cursor.bump();
                    self.make(cursor, start, ClojureTokenKind::UnquoteSplicing)
                } else {
                    self.make(cursor, start, ClojureTokenKind::Unquote)
                }
            }
            '#' => self.read_dispatch(cursor, start),

            '(' => self.single(cursor, start, ClojureTokenKind::LeftParen),
            ')' => self.single(cursor, start, ClojureTokenKind::RightParen),
            '[' => self.single(cursor, start, ClojureTokenKind::LeftBracket),
            ']' => self.single(cursor, start, ClojureTokenKind::RightBracket),
            '{' => self.single(cursor, start, ClojureTokenKind::LeftBrace),
            '}' => self.single(cursor, start, ClojureTokenKind::RightBrace),

            ch if ch.is_ascii_digit() => self.read_number(cursor, start),
            '-' if cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) => {
                self.read_number(cursor, start)
            }

            ch if is_symbol_start(ch) => self.read_symbol(cursor, start),

            _ => {
                self.metrics.record_unknown();
                self.single(cursor, start, ClojureTokenKind::Unknown)
            }
        }
    }

    fn single(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        kind: ClojureTokenKind,
    ) -> Token<ClojureTokenKind> {
        cursor.bump();
        self.make(cursor, start, kind)
    }

    fn make(
        &self,
        cursor: &Cursor<'_>,
        start: Position,
        kind: ClojureTokenKind,
    ) -> Token<ClojureTokenKind> {
        Token::new(kind, cursor.slice_from(start), cursor.span_from(start))
    }

    fn read_whitespace(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        while cursor.current().map(|c| c.is_whitespace()).unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, ClojureTokenKind::Whitespace)
    }

    fn read_comment(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        while cursor.current().map(|c| c != '\n').unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, ClojureTokenKind::Comment)
    }

    fn read_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        cursor.bump(); // opening quote

        loop {
            match cursor.current() {
                None => {
                    log_warning!("Unterminated string literal",
                        "offset" => start.offset,
                        "line" => start.line
                    );
                    break;
                }
                Some('"') => {
                    cursor.bump();
                    break;
                }
                Some('\\') if cursor.peek().is_some() => {
                    // Escape pair copied verbatim, never interpreted
                    cursor.bump();
                    cursor.bump();
                }
                Some(_) => {
                    cursor.bump();
                }
            }
        }

        let token = self.make(cursor, start, ClojureTokenKind::String);
        self.metrics.record_string_length(token.text.len());
        token
    }

    fn read_character(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        cursor.bump(); // backslash

        while cursor
            .current()
            .map(|c| c.is_alphanumeric() || c == '_')
            .unwrap_or(false)
        {
            cursor.bump();
        }

        self.make(cursor, start, ClojureTokenKind::Character)
    }

    fn read_keyword(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        cursor.bump(); // colon

        // Keywords can carry namespace qualifiers (:ns/name)
        while cursor.current().map(is_symbol_char).unwrap_or(false) {
            cursor.bump();
        }

        self.make(cursor, start, ClojureTokenKind::Keyword)
    }

    fn read_dispatch(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        cursor.bump(); // '#'

        if let Some(next) = cursor.current() {
            if matches!(next, '{' | '(' | '\'' | '_' | '"' | '?') {
                cursor.bump();
            }
        }

        self.make(cursor, start, ClojureTokenKind::Dispatch)
    }

    fn read_number(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        if cursor.current() == Some('-') {
            cursor.bump();
        }

        // Digit run with fraction, exponent, big-decimal/bigint suffix,
        // ratio, and radix forms
        while cursor
            .current()
            .map(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | 'M' | 'N' | '/' | 'r'))
            .unwrap_or(false)
        {
            cursor.bump();
        }

        self.make(cursor, start, ClojureTokenKind::Number)
    }

    fn read_symbol(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<ClojureTokenKind> {
        while cursor.current().map(is_symbol_char).unwrap_or(false) {
            cursor.bump();
        }

        let text = cursor.slice_from(start);
        let kind = classify_symbol(text);
        Token::new(kind, text, cursor.span_from(start))
    }
}

impl Default for ClojureLexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::stream::validation;

    fn kinds(tokens: &[Token<ClojureTokenKind>]) -> Vec<ClojureTokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_defn() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("(defn add [x] (+ x 1))");

        let significant: Vec<_> = tokens.iter().filter(|t| !t.is_trivia()).collect();
        assert_eq!(significant[0].kind, ClojureTokenKind::LeftParen);
        assert_eq!(significant[1].kind, ClojureTokenKind::SpecialForm);
        assert_eq!(significant[1].text, "defn");
        assert_eq!(significant[2].kind, ClojureTokenKind::Symbol);
        assert_eq!(significant[2].text, "add");
        assert_eq!(significant[3].kind, ClojureTokenKind::LeftBracket);
        assert_eq!(significant[4].text, "x");
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_offsets_partition_input() {
        let source = "(def x \"hi\") ; done";
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize(source);

        validation::validate_span_order(&tokens).unwrap();
        validation::validate_eof_terminated(&tokens).unwrap();

        // Concatenating token texts reconstructs the input exactly
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_unterminated_string_runs_to_eof() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("(def s \"never closed");

        let string_token = tokens
            .iter()
            .find(|t| t.kind == ClojureTokenKind::String)
            .unwrap();
        assert_eq!(string_token.text, "\"never closed");
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_string_escapes_copied_verbatim() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize(r#""a\"b""#);
        assert_eq!(tokens[0].kind, ClojureTokenKind::String);
        assert_eq!(tokens[0].text, r#""a\"b""#);
    }

    #[test]
    fn test_reader_macros() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("'~@#{ @x");
        let kinds = kinds(&tokens);
        assert_eq!(kinds[0], ClojureTokenKind::Quote);
        assert_eq!(kinds[1], ClojureTokenKind::UnquoteSplicing);
        assert_eq!(kinds[2], ClojureTokenKind::Dispatch);
        assert_eq!(tokens[2].text, "#{");
        assert_eq!(kinds[4], ClojureTokenKind::Deref);
    }

    #[test]
    fn test_character_and_keyword() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("\\newline :my/kw");
        assert_eq!(tokens[0].kind, ClojureTokenKind::Character);
        assert_eq!(tokens[0].text, "\\newline");
        assert_eq!(tokens[2].kind, ClojureTokenKind::Keyword);
        assert_eq!(tokens[2].text, ":my/kw");
    }

    #[test]
    fn test_negative_number_vs_minus_symbol() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("-12 - x");
        assert_eq!(tokens[0].kind, ClojureTokenKind::Number);
        assert_eq!(tokens[0].text, "-12");
        // Bare minus is a symbol in this family
        assert_eq!(tokens[2].kind, ClojureTokenKind::Symbol);
        assert_eq!(tokens[2].text, "-");
    }

    #[test]
    fn test_literals() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("true nil 3.14");
        assert_eq!(tokens[0].kind, ClojureTokenKind::Boolean);
        assert_eq!(tokens[2].kind, ClojureTokenKind::Nil);
        assert_eq!(tokens[4].kind, ClojureTokenKind::Number);
    }

    #[test]
    fn test_unknown_character_degrades() {
        let mut lexer = ClojureLexer::new();
        let tokens = lexer.tokenize("x \u{00a7} y");
        assert!(tokens.iter().any(|t| t.kind == ClojureTokenKind::Unknown));
        assert!(tokens.last().unwrap().is_eof());
        assert_eq!(lexer.metrics().unknown_tokens, 1);
    }

    #[test]
    fn test_determinism() {
        let source = "(defn f [a b] (if (> a b) a b))";
        let mut lexer = ClojureLexer::new();
        let first = lexer.tokenize(source);
        let second = lexer.tokenize(source);
        assert_eq!(first, second);
    }
}
