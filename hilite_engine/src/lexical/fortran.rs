//! Tokenizer for the Fortran-family language
//!
//! Column position matters twice: `C`/`c` opens a comment only in column 1,
//! and a digit run opens a numeric statement label only when it starts a
//! statement within columns 1-6. Keyword classification is case-insensitive.

use crate::lexical::{Cursor, LexicalMetrics};
use crate::logging::codes;
use crate::tokens::fortran::{classify_word, FortranTokenKind};
use crate::tokens::Token;
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};

/// Highest column in which a statement label may begin
const LABEL_COLUMN_LIMIT: u32 = 6;

/// Tokenizer for Fortran-family source text
pub struct FortranLexer {
    metrics: LexicalMetrics,
    /// True until the first significant token on the current line
    statement_start: bool,
}

impl FortranLexer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            statement_start: true,
        }
    }

    /// Get metrics from the most recent tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Convert source text into an EOF-terminated token list. Never fails.
    pub fn tokenize(&mut self, source: &str) -> Vec<Token<FortranTokenKind>> {
        self.metrics = LexicalMetrics::default();
        self.statement_start = true;

        log_debug!("Starting Fortran tokenization", "bytes" => source.len());

        let mut cursor = Cursor::new(source);
        let mut tokens = Vec::new();

        while !cursor.is_at_end() {
            let token = self.next_token(&mut cursor);
            self.track_statement_start(&token);
            self.metrics.record(&token);
            tokens.push(token);
        }

        tokens.push(Token::new(
            FortranTokenKind::Eof,
            "",
            Span::empty(cursor.position()),
        ));

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Fortran tokenization completed",
            "tokens" => tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "comments" => self.metrics.comment_count,
            "unknown" => self.metrics.unknown_tokens
        );

        tokens
    }

    fn track_statement_start(&mut self, token: &Token<FortranTokenKind>) {
        match token.kind {
            FortranTokenKind::Whitespace => {
                if token.text.contains('\n') {
                    self.statement_start = true;
                }
            }
            FortranTokenKind::Comment => {}
            _ => self.statement_start = false,
        }
    }

    fn next_token(&mut self, cursor: &mut Cursor<'_>) -> Token<FortranTokenKind> {
        let start = cursor.position();
        let current = match cursor.current() {
            Some(ch) => ch,
            None => return Token::new(FortranTokenKind::Eof, "", Span::empty(start)),
        };

        match current {
            ch if ch.is_whitespace() => self.read_whitespace(cursor, start),

            // '!' opens a comment anywhere; 'C'/'c' only in column 1
            '!' => self.read_comment(cursor, start),
            'C' | 'c' if cursor.column() == 1 => self.read_comment(cursor, start),

            '\'' | '"' => self.read_string(cursor, start, current),

            ch if ch.is_ascii_digit() => self.read_number_or_label(cursor, start),

            '(' => self.single(cursor, start, FortranTokenKind::LeftParen),
            ')' => self.single(cursor, start, FortranTokenKind::RightParen),
            ',' => self.single(cursor, start, FortranTokenKind::Comma),
            '+' => self.single(cursor, start, FortranTokenKind::Plus),
            '-' => self.single(cursor, start, FortranTokenKind::Minus),
            '*' => self.one_or_two(cursor, start, '*', FortranTokenKind::Multiply, FortranTokenKind::Power),
            '/' => self.one_or_two(cursor, start, '=', FortranTokenKind::Divide, FortranTokenKind::NotEquals),
            '=' => self.one_or_two(cursor, start, '=', FortranTokenKind::Assignment, FortranTokenKind::Equals),
            '<' => self.one_or_two(cursor, start, '=', FortranTokenKind::LessThan, FortranTokenKind::LessOrEqual),
            '>' => self.one_or_two(cursor, start, '=', FortranTokenKind::GreaterThan, FortranTokenKind::GreaterOrEqual),
            ':' => self.one_or_two(cursor, start, ':', FortranTokenKind::Colon, FortranTokenKind::DoubleColon),

            ch if ch.is_alphabetic() || ch == '_' => self.read_identifier(cursor, start),

            _ => {
                self.metrics.record_unknown();
                self.single(cursor, start, FortranTokenKind::Unknown)
            }
        }
    }

    fn single(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        kind: FortranTokenKind,
    ) -> Token<FortranTokenKind> {
        cursor.bump();
        self.make(cursor, start, kind)
    }

    /// Greedy longest-match for one- vs two-character operators
    fn one_or_two(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        second: char,
        short: FortranTokenKind,
        long: FortranTokenKind,
    ) -> Token<FortranTokenKind> {
        cursor.bump();
        if cursor.current() == Some(second) {
            cursor.bump();
            self.make(cursor, start, long)
        } else {
            self.make(cursor, start, short)
        }
    }

    fn make(
        &self,
        cursor: &Cursor<'_>,
        start: Position,
        kind: FortranTokenKind,
    ) -> Token<FortranTokenKind> {
        Token::new(kind, cursor.slice_from(start), cursor.span_from(start))
    }

    fn read_whitespace(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<FortranTokenKind> {
        while cursor.current().map(|c| c.is_whitespace()).unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, FortranTokenKind::Whitespace)
    }

    fn read_comment(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<FortranTokenKind> {
        while cursor.current().map(|c| c != '\n').unwrap_or(false) {
            cursor.bump();
        }
        self.make(cursor, start, FortranTokenKind::Comment)
    }

    fn read_string(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
        quote: char,
    ) -> Token<FortranTokenKind> {
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
                Some(ch) if ch == quote => {
                    // Doubled quote is an escaped quote, not a terminator
                    if cursor.peek() == Some(quote) {
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

        let token = self.make(cursor, start, FortranTokenKind::String);
        self.metrics.record_string_length(token.text.len());
        token
    }

    fn read_number_or_label(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<FortranTokenKind> {
        let label_candidate = self.statement_start && start.column <= LABEL_COLUMN_LIMIT;
        let mut is_real = false;

        while cursor.current().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            cursor.bump();
        }

        if cursor.current() == Some('.')
            && cursor.peek().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_real = true;
            cursor.bump();
            while cursor.current().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                cursor.bump();
            }
        }

        // 'd'/'D' is the double-precision exponent marker
        if let Some(marker) = cursor.current() {
            if matches!(marker, 'e' | 'E' | 'd' | 'D') {
                let mut probe = 1;
                if matches!(cursor.peek_at(probe), Some('+') | Some('-')) {
                    probe += 1;
                }
                if cursor
                    .peek_at(probe)
                    .map(|c| c.is_ascii_digit())
                    .unwrap_or(false)
                {
                    is_real = true;
                    cursor.bump(); // marker
                    if matches!(cursor.current(), Some('+') | Some('-')) {
                        cursor.bump();
                    }
                    while cursor.current().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        cursor.bump();
                    }
                }
            }
        }

        let kind = if is_real {
            FortranTokenKind::Real
        } else if label_candidate {
            FortranTokenKind::Label
        } else {
            FortranTokenKind::Integer
        };

        self.make(cursor, start, kind)
    }

    fn read_identifier(
        &mut self,
        cursor: &mut Cursor<'_>,
        start: Position,
    ) -> Token<FortranTokenKind> {
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

impl Default for FortranLexer {
    fn default() -> Self {
        Self::new()
    }
}
