//! Tokenizer for the C-family language
//!
//! Comment and string forms carry the most edge cases here: `//` and
//! `/* */` comments, plain strings with verbatim escape pairs, `@"..."`
//! verbatim strings with doubled-quote escapes, `$"..."` interpolated
//! strings, and character literals. Operators match greedy-longest so `==`
//! never lexes as two `=` tokens.

use crate::grammar::keywords::csharp;
use crate::lexical::{Cursor, LexicalMetrics};
use crate::logging::codes;
use crate::tokens::csharp::{classify_word, CSharpTokenKind};
use crate::tokens::Token;
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};

/// Tokenizer for C-family source text
pub struct CSharpLexer {
    metrics: LexicalMetrics,
}

impl CSharpLexer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
        }
    }

    /// Get metrics from the most recent tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Convert source text into an EOF-terminated token list. Never fails.
    pub fn tokenize(&mut self, source: &str) -> Vec<Token<CSharpTokenKind>> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting C-family tokenization", "bytes" => source.len());

        let mut cursor = Cursor::new(source);
        let mut tokens = Vec::new();

        while !cursor.is_at_end() {
            let token = self.next_token(&mut cursor);
            self.metrics.record(&token);
            tokens.push(token);
        }

        tokens.push(Token::new(
            CSharpTokenKind::Eof,
            "",
            Span::empty(cursor.position()),
        ));

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "C-family tokenization completed",
            "tokens" => tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "comments" => self.metrics.comment_count,
            "unknown" => self.metrics.unknown_tokens
        );

        tokens
    }

    fn next_token(&mut self, cursor: &mut Cursor<'_>) -> Token<CSharpTokenKind> {
        let start = cursor.position();
        let current = match cursor.current() {
            Some(ch) => ch,
            None => return Token::new(CSharpTokenKind::Eof, "", Span::empty(start)),
        };

        match current {
            ch if ch.is_whitespace() => self.read_whitespace(cursor, start),

            '/' if cursor.peek() == Some('/') => self.read_line_comment(cursor, start),
            '/' if cursor.peek() == Some('*') => self.read_block_comment(cursor, start),

            '#' => self.read_preprocessor(cursor, start),

            '[' => {
                if self.looks_like_attribute(cursor) {
                    self.read_attribute(cursor, start)
                } else {
                    self.single(cursor, start, CSharpTokenKind::LeftBracket)
                }
            }

            '"' => self.read_string(cursor, start),
            '@' if cursor.peek() == Some('"') => self.read_verbatim_string(cursor, start),
            '$' if cursor.peek() == Some('"') => self.read_interpolated_string(cursor, start),
            '\'' => self.read_character(cursor, start),

            '(' => self.single(cursor, start, CSharpTokenKind::LeftParen),
            ')' => self.single(cursor, start, CSharpTokenKind::RightParen),
            '{' => self.single(cursor, start, CSharpTokenKind::LeftBrace),
            '}' => self.single(cursor, start, CSharpTokenKind::RightBrace),
            ']' => self.single(cursor, start, CSharpTokenKind::RightBracket),
            ';' => self.single(cursor, start, CSharpTokenKind::Semicolon),
            ',' => self.single(cursor, start, CSharpTokenKind::Comma),
            ':' => self.single(cursor, start, CSharpTokenKind::Colon),

            ch if ch.is_ascii_digit() => self.read_number(cursor, start),

            _ => {
                if let Some(token) = self.try_read_operator(cursor, start) {
                    token
                } else if current.is_alphabetic() || current == '_' || current == '@' {
                    self.read_identifier(cursor, start)
                } else if current == '.' {
                    self.single(cursor, start, CSharpTokenKind::Dot)
                } else {
                    self.metrics.record_unknown();
                    self.single(cursor, start, CSharpTokenKind::Unknown)
                }
            }
        }
    }

    fn single(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        kind: CSharpTokenKind,
    ) -> Token<CSharpTokenKind> {
        cursor.bump();
        self.make(cursor, start, kind)
    }

    fn make(
        &self,
        cursor: &Cursor<'_>,
        start: Position,
        kind: CSharpTokenKind,
    ) -> Token<CSharpTokenKind> {
        Token::new(kind, cursor.slice_from(start), cursor.span_from(start))
    }

    fn read_whitespace(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        while cursor.current().map(|c| c.is_whitespace()).unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, CSharpTokenKind::Whitespace)
    }

    fn read_line_comment(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        while cursor.current().map(|c| c != '\n').unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, CSharpTokenKind::Comment)
    }

    fn read_block_comment(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        cursor.bump(); // '/'
        cursor.bump(); // '*'

        loop {
            match cursor.current() {
                None => {
                    log_warning!("Unterminated block comment",
                        "offset" => start.offset,
                        "line" => start.line
                    );
                    break;
                }
                Some('*') if cursor.peek() == Some('/') => {
                    cursor.bump();
                    cursor.bump();
                    break;
                }
                Some(_) => {
                    cursor.bump();
                }
            }
        }

        self.make(cursor, start, CSharpTokenKind::Comment)
    }

    fn read_preprocessor(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        while cursor.current().map(|c| c != '\n').unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, CSharpTokenKind::Preprocessor)
    }

    /// Lookahead (without consuming) to decide whether `[` opens an
    /// attribute: a `]` must appear before any `;`, `{`, or newline
    fn looks_like_attribute(&self, cursor: &Cursor<'_>) -> bool {
        let mut n = 1;
        while let Some(ch) = cursor.peek_at(n) {
            match ch {
                ']' => return true,
                ';' | '{' | '\n' => return false,
                _ => n += 1,
            }
        }
        false
    }

    fn read_attribute(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        while cursor.current().map(|c| c != ']').unwrap_or(false) {
            cursor.bump();
        }
        if !cursor.is_at_end() {
            cursor.bump(); // ']'
        }
        self.make(cursor, start, CSharpTokenKind::Attribute)
    }

    fn read_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        cursor.bump(); // opening quote
        self.consume_escaped_string_body(cursor, start);

        let token = self.make(cursor, start, CSharpTokenKind::String);
        self.metrics.record_string_length(token.text.len());
        token
    }

    fn read_interpolated_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        cursor.bump(); // '$'
        cursor.bump(); // '"'
        self.consume_escaped_string_body(cursor, start);

        let token = self.make(cursor, start, CSharpTokenKind::String);
        self.metrics.record_string_length(token.text.len());
        token
    }

    fn consume_escaped_string_body(&mut self, cursor: &mut Cursor<'_>, start: Position) {
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
    }

    fn read_verbatim_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        cursor.bump(); // '@'
        cursor.bump(); // '"'

        loop {
            match cursor.current() {
                None => {
                    log_warning!("Unterminated verbatim string",
                        "offset" => start.offset,
                        "line" => start.line
                    );
                    break;
                }
                Some('"') => {
                    // Doubled quote is an escaped quote, not a terminator
                    if cursor.peek() == Some('"') {
                        cursor.bump();
                        cursor.bump();
                    } else {
                        cursor.bump();
                        break;
                    }
                }
                Some(_) => {
                    cursor.bump();
                }
            }
        }

        let token = self.make(cursor, start, CSharpTokenKind::String);
        self.metrics.record_string_length(token.text.len());
        token
    }

    fn read_character(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        cursor.bump(); // opening quote

        loop {
            match cursor.current() {
                None => break,
                Some('\'') => {
                    cursor.bump();
                    break;
                }
                Some('\\') if cursor.peek().is_some() => {
                    cursor.bump();
                    cursor.bump();
                }
                Some(_) => {
                    cursor.bump();
                }
            }
        }

        self.make(cursor, start, CSharpTokenKind::Character)
    }

    fn read_number(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        if cursor.current() == Some('0') && matches!(cursor.peek(), Some('x') | Some('X')) {
            cursor.bump();
            cursor.bump();
            while cursor
                .current()
                .map(|c| c.is_ascii_hexdigit())
                .unwrap_or(false)
            {
                cursor.bump();
            }
        } else {
            while cursor
                .current()
                .map(|c| c.is_ascii_digit() || c == '.')
                .unwrap_or(false)
            {
                cursor.bump();
            }

            if matches!(cursor.current(), Some('e') | Some('E')) {
                cursor.bump();
                if matches!(cursor.current(), Some('+') | Some('-')) {
                    cursor.bump();
                }
                while cursor.current().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    cursor.bump();
                }
            }
        }

        // Numeric type suffix
        if cursor
            .current()
            .map(|c| "fFdDmMlLuU".contains(c))
            .unwrap_or(false)
        {
            cursor.bump();
        }

        self.make(cursor, start, CSharpTokenKind::Number)
    }

    fn try_read_operator(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Option<Token<CSharpTokenKind>> {
        let rest = cursor.rest();
        let op = csharp::OPERATORS.iter().find(|op| rest.starts_with(**op))?;

        for _ in 0..op.chars().count() {
            cursor.bump();
        }
        Some(self.make(cursor, start, CSharpTokenKind::Operator))
    }

    fn read_identifier(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<CSharpTokenKind> {
        if cursor.current() == Some('@') {
            cursor.bump();
        }

        while cursor
            .current()
            .map(|c| c.is_alphanumeric() || c == '_')
            .unwrap_or(false)
        {
            cursor.bump();
        }

        let text = cursor.slice_from(start);
        Token::new(classify_word(text), text, cursor.span_from(start))
    }
}

impl Default for CSharpLexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::stream::validation;

    #[test]
    fn test_comments() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("// line\n/* block\nspans */ x");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Comment);
        assert_eq!(tokens[0].text, "// line");
        assert_eq!(tokens[2].kind, CSharpTokenKind::Comment);
        assert_eq!(tokens[2].text, "/* block\nspans */");
        // Line counting continues across the embedded newline
        let x = tokens.iter().find(|t| t.text == "x").unwrap();
        assert_eq!(x.line(), 3);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("/* never closed");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Comment);
        assert_eq!(tokens[0].text, "/* never closed");
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_string_variants() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize(r#""a\"b" @"c""d" $"e{f}""#);
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CSharpTokenKind::String)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec![r#""a\"b""#, r#"@"c""d""#, r#"$"e{f}""#]);
    }

    #[test]
    fn test_unterminated_string_runs_to_eof() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("var s = \"oops");
        let string_token = tokens
            .iter()
            .find(|t| t.kind == CSharpTokenKind::String)
            .unwrap();
        assert_eq!(string_token.text, "\"oops");
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_character_literal() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize(r"'a' '\n'");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Character);
        assert_eq!(tokens[0].text, "'a'");
        assert_eq!(tokens[2].kind, CSharpTokenKind::Character);
        assert_eq!(tokens[2].text, r"'\n'");
    }

    #[test]
    fn test_numbers() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("42 3.14f 0xFF 1e-9 100L");
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CSharpTokenKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["42", "3.14f", "0xFF", "1e-9", "100L"]);
    }

    #[test]
    fn test_operator_longest_match() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("a == b <<= c ?? d");
        let ops: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CSharpTokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["==", "<<=", "??"]);
    }

    #[test]
    fn test_attribute_vs_bracket() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("[Serializable] int[] xs;");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Attribute);
        assert_eq!(tokens[0].text, "[Serializable]");

        // Array brackets after a newline boundary are plain brackets
        let tokens = lexer.tokenize("xs[\n1]");
        assert_eq!(tokens[1].kind, CSharpTokenKind::LeftBracket);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("public class Foo { }");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Keyword);
        assert_eq!(tokens[2].kind, CSharpTokenKind::Keyword);
        assert_eq!(tokens[4].kind, CSharpTokenKind::Identifier);
        assert_eq!(tokens[4].text, "Foo");
    }

    #[test]
    fn test_preprocessor_line() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("#region Setup\nint x;");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Preprocessor);
        assert_eq!(tokens[0].text, "#region Setup");
    }

    #[test]
    fn test_tokens_partition_input() {
        let source = "public int Add(int a, int b) { return a + b; }";
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize(source);

        validation::validate_span_order(&tokens).unwrap();
        validation::validate_eof_terminated(&tokens).unwrap();

        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_boolean_and_null() {
        let mut lexer = CSharpLexer::new();
        let tokens = lexer.tokenize("true null");
        assert_eq!(tokens[0].kind, CSharpTokenKind::Boolean);
        assert_eq!(tokens[2].kind, CSharpTokenKind::Null);
    }
}
