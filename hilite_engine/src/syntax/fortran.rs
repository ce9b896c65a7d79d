//! Recursive-descent parser for the Fortran-family language
//!
//! Statement dispatch keys off the leading keyword. Program units collect
//! their variable declarations separately from executable statements, and
//! `end` handling accepts both the bare form and `end program`-style
//! closers.

use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::ast::fortran::{FortranNode, IdentifierNode, IdentifierRole};
use crate::grammar::keywords::FortranKeyword;
use crate::logging::codes;
use crate::syntax::ParseMetrics;
use crate::tokens::{FortranTokenKind, Token, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success};

type FToken = Token<FortranTokenKind>;

/// Parser over a Fortran-family token stream
pub struct FortranParser {
    tokens: TokenStream<FortranTokenKind>,
    metrics: ParseMetrics,
    depth: usize,
}

impl FortranParser {
    pub fn new(tokens: Vec<FToken>) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            metrics: ParseMetrics::default(),
            depth: 0,
        }
    }

    /// Get metrics from the most recent parse
    pub fn metrics(&self) -> &ParseMetrics {
        &self.metrics
    }

    /// Recover the full token list (including trivia) after parsing
    pub fn into_tokens(self) -> Vec<FToken> {
        self.tokens.into_tokens()
    }

    /// Parse the token stream into a forest of top-level nodes
    pub fn parse(&mut self) -> Vec<FortranNode> {
        log_debug!("Starting Fortran parse", "significant_tokens" => self.tokens.len());

        let mut forest = Vec::new();

        while !self.tokens.is_at_end() {
            let before = self.tokens.position();
            if let Some(node) = self.parse_statement() {
                forest.push(node);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE,
            "Fortran parse completed",
            "top_level_nodes" => forest.len(),
            "nodes_built" => self.metrics.nodes_built,
            "tokens_skipped" => self.metrics.tokens_skipped
        );

        forest
    }

    fn parse_statement(&mut self) -> Option<FortranNode> {
        if self.depth >= MAX_PARSE_DEPTH {
            self.metrics.depth_limit_hits += 1;
            self.tokens.advance();
            return None;
        }

        let token = self.tokens.current()?.clone();
        self.depth += 1;
        let node = match token.kind {
            FortranTokenKind::Keyword(FortranKeyword::Program) => Some(self.parse_program(token)),
            FortranTokenKind::Keyword(FortranKeyword::Subroutine) => {
                Some(self.parse_unit(token, UnitKind::Subroutine))
            }
            FortranTokenKind::Keyword(FortranKeyword::Function) => {
                Some(self.parse_unit(token, UnitKind::Function))
            }
            FortranTokenKind::Keyword(kw) if kw.is_type_keyword() => {
                Some(self.parse_variable_declaration(token))
            }
            FortranTokenKind::Keyword(FortranKeyword::Do) => Some(self.parse_do_loop(token)),
            FortranTokenKind::Keyword(FortranKeyword::If) => Some(self.parse_if(token)),
            FortranTokenKind::Keyword(FortranKeyword::Call) => {
                Some(self.parse_call_statement(token))
            }
            FortranTokenKind::Identifier => self.parse_assignment_or_call(token),
            _ => self.parse_expression(),
        };
        self.depth -= 1;
        node
    }

    fn parse_program(&mut self, keyword: FToken) -> FortranNode {
        let start = keyword.span.start;
        self.tokens.advance(); // program

        let name = self.take_identifier(IdentifierRole::ProgramName);
        let (declarations, body) = self.parse_unit_body();
        let end = self.consume_end_statement(start);

        self.metrics.nodes_built += 1;
        FortranNode::Program {
            keyword,
            name,
            declarations,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_unit(&mut self, keyword: FToken, kind: UnitKind) -> FortranNode {
        let start = keyword.span.start;
        self.tokens.advance(); // subroutine / function

        let role = match kind {
            UnitKind::Subroutine => IdentifierRole::SubroutineName,
            UnitKind::Function => IdentifierRole::FunctionName,
        };
        let name = self.take_identifier(role);
        let parameters = self.take_parameter_list();
        let (declarations, body) = self.parse_unit_body();
        let end = self.consume_end_statement(start);
        let span = Span::new(start, end);

        self.metrics.nodes_built += 1;
        match kind {
            UnitKind::Subroutine => FortranNode::Subroutine {
                keyword,
                name,
                parameters,
                declarations,
                body,
                span,
            },
            UnitKind::Function => FortranNode::Function {
                keyword,
                name,
                parameters,
                declarations,
                body,
                span,
            },
        }
    }

    /// Statements until a bare `end`, split into declarations and body
    fn parse_unit_body(&mut self) -> (Vec<FortranNode>, Vec<FortranNode>) {
        let mut declarations = Vec::new();
        let mut body = Vec::new();

        while !self.tokens.is_at_end() && !self.at_end_keyword() {
            let before = self.tokens.position();
            if let Some(stmt) = self.parse_statement() {
                if stmt.is_declaration() {
                    declarations.push(stmt);
                } else {
                    body.push(stmt);
                }
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        (declarations, body)
    }

    fn parse_variable_declaration(&mut self, type_keyword: FToken) -> FortranNode {
        let start = type_keyword.span.start;
        self.tokens.advance(); // type keyword

        if self.at_kind(FortranTokenKind::DoubleColon) {
            self.tokens.advance();
        }

        let mut variables = Vec::new();
        while self.at_kind(FortranTokenKind::Identifier) {
            if let Some(token) = self.tokens.current() {
                variables.push(IdentifierNode::new(
                    token.clone(),
                    IdentifierRole::VariableName,
                ));
            }
            self.tokens.advance();

            // Array dimension list is skipped, not modeled
            if self.at_kind(FortranTokenKind::LeftParen) {
                self.tokens.advance();
                while !self.tokens.is_at_end() && !self.at_kind(FortranTokenKind::RightParen) {
                    self.tokens.advance();
                }
                if self.at_kind(FortranTokenKind::RightParen) {
                    self.tokens.advance();
                }
            }

            if self.at_kind(FortranTokenKind::Comma) {
                self.tokens.advance();
            } else {
                break;
            }
        }

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        FortranNode::VariableDeclaration {
            type_keyword,
            variables,
            span: Span::new(start, end),
        }
    }

    fn parse_do_loop(&mut self, keyword: FToken) -> FortranNode {
        let start = keyword.span.start;
        self.tokens.advance(); // do

        let mut variable = None;
        let mut start_value = None;
        let mut end_value = None;
        let mut step_value = None;

        if self.at_kind(FortranTokenKind::Identifier) {
            variable = self.take_identifier(IdentifierRole::LoopVariable);

            if self.at_kind(FortranTokenKind::Assignment) {
                self.tokens.advance();
                start_value = self.parse_expression().map(Box::new);

                if self.at_kind(FortranTokenKind::Comma) {
                    self.tokens.advance();
                    end_value = self.parse_expression().map(Box::new);

                    if self.at_kind(FortranTokenKind::Comma) {
                        self.tokens.advance();
                        step_value = self.parse_expression().map(Box::new);
                    }
                }
            }
        }

        let mut body = Vec::new();
        while !self.tokens.is_at_end()
            && !self.at_keyword(FortranKeyword::EndDo)
            && !self.at_end_keyword()
        {
            let before = self.tokens.position();
            if let Some(stmt) = self.parse_statement() {
                body.push(stmt);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let end = if self.at_keyword(FortranKeyword::EndDo) {
            let end = self.current_end(start);
            self.tokens.advance();
            end
        } else if self.at_end_keyword() && self.next_is_keyword(FortranKeyword::Do) {
            self.tokens.advance(); // end
            let end = self.current_end(start);
            self.tokens.advance(); // do
            end
        } else {
            // A bare `end` closes the enclosing unit, not the loop
            self.last_consumed_end(start)
        };

        self.metrics.nodes_built += 1;
        FortranNode::DoLoop {
            keyword,
            variable,
            start: start_value,
            end: end_value,
            step: step_value,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_if(&mut self, keyword: FToken) -> FortranNode {
        let start = keyword.span.start;
        self.tokens.advance(); // if

        let mut condition = None;
        if self.at_kind(FortranTokenKind::LeftParen) {
            self.tokens.advance();
            condition = self.parse_expression().map(Box::new);
            if self.at_kind(FortranTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        if self.at_keyword(FortranKeyword::Then) {
            self.tokens.advance();
        }

        let mut then_block = Vec::new();
        while !self.tokens.is_at_end()
            && !self.at_keyword(FortranKeyword::Else)
            && !self.at_keyword(FortranKeyword::ElseIf)
            && !self.at_keyword(FortranKeyword::EndIf)
            && !self.at_end_keyword()
        {
            let before = self.tokens.position();
            if let Some(stmt) = self.parse_statement() {
                then_block.push(stmt);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let mut else_block = Vec::new();
        if self.at_keyword(FortranKeyword::Else) {
            self.tokens.advance();

            while !self.tokens.is_at_end()
                && !self.at_keyword(FortranKeyword::EndIf)
                && !self.at_end_keyword()
            {
                let before = self.tokens.position();
                if let Some(stmt) = self.parse_statement() {
                    else_block.push(stmt);
                }
                if self.tokens.position() == before {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }
        }

        let end = if self.at_keyword(FortranKeyword::EndIf) {
            let end = self.current_end(start);
            self.tokens.advance();
            end
        } else if self.at_end_keyword() && self.next_is_keyword(FortranKeyword::If) {
            self.tokens.advance(); // end
            let end = self.current_end(start);
            self.tokens.advance(); // if
            end
        } else {
            self.last_consumed_end(start)
        };

        self.metrics.nodes_built += 1;
        FortranNode::If {
            keyword,
            condition,
            then_block,
            else_block,
            span: Span::new(start, end),
        }
    }

    fn parse_call_statement(&mut self, keyword: FToken) -> FortranNode {
        let start = keyword.span.start;
        self.tokens.advance(); // call

        let name = self.take_identifier(IdentifierRole::FunctionCall);
        let (arguments, end) = self.take_argument_list(start);

        self.metrics.nodes_built += 1;
        FortranNode::CallStatement {
            keyword,
            name,
            arguments,
            span: Span::new(start, end),
        }
    }

    fn parse_assignment_or_call(&mut self, identifier: FToken) -> Option<FortranNode> {
        let start = identifier.span.start;
        self.tokens.advance(); // identifier

        if self.at_kind(FortranTokenKind::Assignment) {
            self.tokens.advance();
            let value = self.parse_expression().map(Box::new);
            let end = self.last_consumed_end(start);

            self.metrics.nodes_built += 1;
            return Some(FortranNode::Assignment {
                target: IdentifierNode::new(identifier, IdentifierRole::VariableName),
                value,
                span: Span::new(start, end),
            });
        }

        if self.at_kind(FortranTokenKind::LeftParen) {
            let callee = IdentifierNode::new(identifier, IdentifierRole::FunctionCall);
            let (arguments, end) = self.take_argument_list(start);

            self.metrics.nodes_built += 1;
            return Some(FortranNode::FunctionCall {
                callee,
                arguments,
                span: Span::new(start, end),
            });
        }

        self.metrics.nodes_built += 1;
        Some(FortranNode::Identifier(IdentifierNode::new(
            identifier,
            IdentifierRole::Unknown,
        )))
    }

    /// Precedence-free, left-associative expression: a primary followed by
    /// any number of operator/primary pairs
    fn parse_expression(&mut self) -> Option<FortranNode> {
        let mut expr = self.parse_primary()?;

        while self.at_binary_operator() {
            let op_span = self.tokens.current_span();
            self.tokens.advance(); // operator keeps its lexical color

            let right = self.parse_primary();
            let end = right
                .as_ref()
                .map(|r| r.span().end)
                .or_else(|| op_span.map(|s| s.end))
                .unwrap_or(expr.span().end);
            let span = Span::new(expr.span().start, end);

            self.metrics.nodes_built += 1;
            expr = FortranNode::BinaryExpression {
                left: Box::new(expr),
                right: right.map(Box::new),
                span,
            };
        }

        Some(expr)
    }

    fn at_binary_operator(&self) -> bool {
        matches!(
            self.tokens.current_kind(),
            Some(
                FortranTokenKind::Plus
                    | FortranTokenKind::Minus
                    | FortranTokenKind::Multiply
                    | FortranTokenKind::Divide
                    | FortranTokenKind::Power
                    | FortranTokenKind::Equals
                    | FortranTokenKind::NotEquals
                    | FortranTokenKind::LessThan
                    | FortranTokenKind::LessOrEqual
                    | FortranTokenKind::GreaterThan
                    | FortranTokenKind::GreaterOrEqual
            )
        )
    }

    fn parse_primary(&mut self) -> Option<FortranNode> {
        if self.depth >= MAX_PARSE_DEPTH {
            self.metrics.depth_limit_hits += 1;
            self.tokens.advance();
            return None;
        }

        let token = self.tokens.current()?.clone();
        match token.kind {
            FortranTokenKind::Integer
            | FortranTokenKind::Real
            | FortranTokenKind::String
            | FortranTokenKind::Logical => {
                self.tokens.advance();
                self.metrics.nodes_built += 1;
                Some(FortranNode::Literal { token })
            }
            FortranTokenKind::Identifier => {
                let start = token.span.start;
                self.tokens.advance();

                if self.at_kind(FortranTokenKind::LeftParen) {
                    let callee = IdentifierNode::new(token, IdentifierRole::FunctionCall);
                    let (arguments, end) = self.take_argument_list(start);

                    self.metrics.nodes_built += 1;
                    return Some(FortranNode::FunctionCall {
                        callee,
                        arguments,
                        span: Span::new(start, end),
                    });
                }

                self.metrics.nodes_built += 1;
                Some(FortranNode::Identifier(IdentifierNode::new(
                    token,
                    IdentifierRole::Unknown,
                )))
            }
            FortranTokenKind::LeftParen => {
                self.tokens.advance();
                self.depth += 1;
                let expr = self.parse_expression();
                self.depth -= 1;
                if self.at_kind(FortranTokenKind::RightParen) {
                    self.tokens.advance();
                }
                expr
            }
            _ => {
                self.tokens.advance();
                None
            }
        }
    }

    // === SHARED PIECES ===

    fn at_kind(&self, kind: FortranTokenKind) -> bool {
        self.tokens.current_kind() == Some(kind)
    }

    fn at_keyword(&self, keyword: FortranKeyword) -> bool {
        matches!(
            self.tokens.current_kind(),
            Some(FortranTokenKind::Keyword(kw)) if kw == keyword
        )
    }

    fn at_end_keyword(&self) -> bool {
        self.at_keyword(FortranKeyword::End)
    }

    fn next_is_keyword(&self, keyword: FortranKeyword) -> bool {
        matches!(
            self.tokens.peek().map(|t| t.kind),
            Some(FortranTokenKind::Keyword(kw)) if kw == keyword
        )
    }

    fn take_identifier(&mut self, role: IdentifierRole) -> Option<IdentifierNode> {
        let token = self.tokens.current()?.clone();
        if token.kind == FortranTokenKind::Identifier {
            self.tokens.advance();
            Some(IdentifierNode::new(token, role))
        } else {
            None
        }
    }

    /// `(a, b, c)` dummy-argument list on a unit header
    fn take_parameter_list(&mut self) -> Vec<IdentifierNode> {
        let mut parameters = Vec::new();

        if self.at_kind(FortranTokenKind::LeftParen) {
            self.tokens.advance();

            while !self.tokens.is_at_end() && !self.at_kind(FortranTokenKind::RightParen) {
                if let Some(token) = self.tokens.current() {
                    if token.kind == FortranTokenKind::Identifier {
                        parameters
                            .push(IdentifierNode::new(token.clone(), IdentifierRole::Parameter));
                    }
                }
                self.tokens.advance();

                if self.at_kind(FortranTokenKind::Comma) {
                    self.tokens.advance();
                }
            }

            if self.at_kind(FortranTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        parameters
    }

    /// `(expr, expr, ...)` argument list; returns arguments and the end
    /// position after the closing paren (or the last consumed token)
    fn take_argument_list(&mut self, start: Position) -> (Vec<FortranNode>, Position) {
        let mut arguments = Vec::new();

        if !self.at_kind(FortranTokenKind::LeftParen) {
            return (arguments, self.last_consumed_end(start));
        }
        self.tokens.advance(); // '('

        while !self.tokens.is_at_end() && !self.at_kind(FortranTokenKind::RightParen) {
            let before = self.tokens.position();
            if let Some(arg) = self.parse_expression() {
                arguments.push(arg);
            }
            if self.at_kind(FortranTokenKind::Comma) {
                self.tokens.advance();
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let end = if self.at_kind(FortranTokenKind::RightParen) {
            let end = self.current_end(start);
            self.tokens.advance();
            end
        } else {
            self.last_consumed_end(start)
        };

        (arguments, end)
    }

    /// Consume `end` plus an optional trailing unit keyword, returning the
    /// end position
    fn consume_end_statement(&mut self, start: Position) -> Position {
        if !self.at_end_keyword() {
            return self.last_consumed_end(start);
        }

        let mut end = self.current_end(start);
        self.tokens.advance(); // end

        if matches!(
            self.tokens.current_kind(),
            Some(FortranTokenKind::Keyword(
                FortranKeyword::Program | FortranKeyword::Subroutine | FortranKeyword::Function
            ))
        ) {
            end = self.current_end(start);
            self.tokens.advance();
        }

        end
    }

    fn current_end(&self, start: Position) -> Position {
        self.tokens
            .current_span()
            .map(|s| s.end)
            .unwrap_or(start)
    }

    fn last_consumed_end(&self, start: Position) -> Position {
        self.tokens
            .previous_span()
            .map(|s| s.end)
            .filter(|end| end.offset >= start.offset)
            .unwrap_or(start)
    }
}

enum UnitKind {
    Subroutine,
    Function,
}
