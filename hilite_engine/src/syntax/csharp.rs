//! Recursive-descent parser for the C-family language
//!
//! The load-bearing mechanism here is checkpointed lookahead: member and
//! statement classification probes ahead over the shared cursor, then
//! restores it before committing to a production, so an abandoned probe
//! leaves no cursor corruption. `Type name ...` resolves to a declaration
//! only when a second identifier follows the first.

use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::ast::csharp::{CSharpNode, ParameterNode, SymbolNode, SymbolRole};
use crate::grammar::keywords::csharp as words;
use crate::logging::codes;
use crate::syntax::ParseMetrics;
use crate::tokens::{CSharpTokenKind, Token, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success};

type CsToken = Token<CSharpTokenKind>;

/// Parser over a C-family token stream
pub struct CSharpParser {
    tokens: TokenStream<CSharpTokenKind>,
    metrics: ParseMetrics,
    depth: usize,
}

impl CSharpParser {
    pub fn new(tokens: Vec<CsToken>) -> Self {
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
    pub fn into_tokens(self) -> Vec<CsToken> {
        self.tokens.into_tokens()
    }

    /// Parse the token stream into a forest of top-level nodes
    pub fn parse(&mut self) -> Vec<CSharpNode> {
        log_debug!("Starting C-family parse", "significant_tokens" => self.tokens.len());

        let mut forest = Vec::new();

        while !self.tokens.is_at_end() {
            let before = self.tokens.position();
            if let Some(node) = self.parse_top_level() {
                forest.push(node);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE,
            "C-family parse completed",
            "top_level_nodes" => forest.len(),
            "nodes_built" => self.metrics.nodes_built,
            "tokens_skipped" => self.metrics.tokens_skipped,
            "recoveries" => self.metrics.recoveries
        );

        forest
    }

    fn parse_top_level(&mut self) -> Option<CSharpNode> {
        let token = self.tokens.current()?.clone();

        if self.at_keyword_text("using") {
            return Some(self.parse_using(token));
        }
        if self.at_keyword_text("namespace") {
            return Some(self.parse_namespace(token));
        }
        if token.kind == CSharpTokenKind::Attribute {
            return Some(self.parse_attribute(token));
        }
        if self.looks_like_type_declaration() {
            return self.parse_type_declaration();
        }

        self.tokens.advance();
        self.metrics.tokens_skipped += 1;
        None
    }

    fn parse_using(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // using

        let name = self.take_dotted_name(SymbolRole::NamespaceName);

        self.skip_until(&[CSharpTokenKind::Semicolon]);
        let end = self.consume_current_end(start);

        self.metrics.nodes_built += 1;
        CSharpNode::Using {
            keyword,
            name,
            span: Span::new(start, end),
        }
    }

    fn parse_namespace(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // namespace

        let name = self.take_dotted_name(SymbolRole::NamespaceName);

        let mut members = Vec::new();
        let mut end = self.last_consumed_end(start);

        if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.tokens.advance();

            while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightBrace) {
                let before = self.tokens.position();
                if let Some(member) = self.parse_top_level() {
                    members.push(member);
                }
                if self.tokens.position() == before {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }

            end = self.consume_current_end(start);
        }

        self.metrics.nodes_built += 1;
        CSharpNode::Namespace {
            keyword,
            name,
            members,
            span: Span::new(start, end),
        }
    }

    /// Checkpointed probe: do modifiers lead to a type keyword?
    fn looks_like_type_declaration(&mut self) -> bool {
        let checkpoint = self.tokens.save_position();

        while self.at_modifier() {
            self.tokens.advance();
        }
        let is_type = matches!(
            self.tokens.current(),
            Some(token) if token.kind == CSharpTokenKind::Keyword
                && words::is_type_keyword(&token.text)
        );

        self.tokens.restore_position(checkpoint);
        is_type
    }

    fn parse_type_declaration(&mut self) -> Option<CSharpNode> {
        let modifiers = self.take_modifiers();

        let keyword = self.tokens.current()?.clone();
        if keyword.kind != CSharpTokenKind::Keyword {
            return None;
        }

        match keyword.text.as_str() {
            "class" => Some(self.parse_type_body(modifiers, keyword, TypeKind::Class)),
            "interface" => Some(self.parse_type_body(modifiers, keyword, TypeKind::Interface)),
            "enum" => Some(self.parse_enum(modifiers, keyword)),
            _ => None,
        }
    }

    /// Class and interface share header and body shape
    fn parse_type_body(
        &mut self,
        modifiers: Vec<CsToken>,
        keyword: CsToken,
        kind: TypeKind,
    ) -> CSharpNode {
        let start = modifiers
            .first()
            .map(|m| m.span.start)
            .unwrap_or(keyword.span.start);
        self.tokens.advance(); // class / interface

        let name_role = match kind {
            TypeKind::Class => SymbolRole::ClassName,
            TypeKind::Interface => SymbolRole::InterfaceName,
        };
        let name = self.take_identifier(name_role);

        let mut base_types = Vec::new();
        if self.at_kind(CSharpTokenKind::Colon) {
            self.tokens.advance();

            while self.at_kind(CSharpTokenKind::Identifier) {
                if let Some(token) = self.tokens.current() {
                    base_types.push(SymbolNode::new(token.clone(), SymbolRole::TypeName));
                }
                self.tokens.advance();

                if self.at_kind(CSharpTokenKind::Comma) {
                    self.tokens.advance();
                } else {
                    break;
                }
            }
        }

        let mut members = Vec::new();
        let mut end = self.last_consumed_end(start);

        if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.tokens.advance();

            while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightBrace) {
                let before = self.tokens.position();
                if let Some(member) = self.parse_member() {
                    members.push(member);
                }
                if self.tokens.position() == before {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }

            end = self.consume_current_end(start);
        }

        self.metrics.nodes_built += 1;
        match kind {
            TypeKind::Class => CSharpNode::Class {
                modifiers,
                keyword,
                name,
                base_types,
                members,
                span: Span::new(start, end),
            },
            TypeKind::Interface => CSharpNode::Interface {
                modifiers,
                keyword,
                name,
                base_types,
                members,
                span: Span::new(start, end),
            },
        }
    }

    fn parse_enum(&mut self, modifiers: Vec<CsToken>, keyword: CsToken) -> CSharpNode {
        let start = modifiers
            .first()
            .map(|m| m.span.start)
            .unwrap_or(keyword.span.start);
        self.tokens.advance(); // enum

        let name = self.take_identifier(SymbolRole::EnumName);

        let mut members = Vec::new();
        let mut end = self.last_consumed_end(start);

        if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.tokens.advance();

            while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightBrace) {
                if self.at_kind(CSharpTokenKind::Identifier) {
                    if let Some(token) = self.tokens.current() {
                        members.push(SymbolNode::new(token.clone(), SymbolRole::FieldName));
                    }
                    self.tokens.advance();

                    // Explicit values are skipped, not modeled
                    if self.at_operator_text("=") {
                        self.skip_until(&[CSharpTokenKind::Comma, CSharpTokenKind::RightBrace]);
                    }

                    if self.at_kind(CSharpTokenKind::Comma) {
                        self.tokens.advance();
                    }
                } else {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }

            end = self.consume_current_end(start);
        }

        self.metrics.nodes_built += 1;
        CSharpNode::Enum {
            modifiers,
            keyword,
            name,
            members,
            span: Span::new(start, end),
        }
    }

    /// Classify a type member by probing past `Type Name` for `(`, `{`, or
    /// `;`/`=`, then rewinding and committing
    fn parse_member(&mut self) -> Option<CSharpNode> {
        let token = self.tokens.current()?.clone();

        if token.kind == CSharpTokenKind::Attribute {
            return Some(self.parse_attribute(token));
        }

        // Nested type declarations are valid members too
        if self.looks_like_type_declaration() {
            return self.parse_type_declaration();
        }

        let modifiers = self.take_modifiers();

        let checkpoint = self.tokens.save_position();
        if matches!(
            self.tokens.current_kind(),
            Some(CSharpTokenKind::Identifier | CSharpTokenKind::Keyword)
        ) {
            self.tokens.advance(); // candidate type

            if self.at_kind(CSharpTokenKind::Identifier) {
                self.tokens.advance(); // candidate name

                let decision = self.tokens.current_kind();
                self.tokens.restore_position(checkpoint);

                match decision {
                    Some(CSharpTokenKind::LeftParen) => {
                        return Some(self.parse_method(modifiers));
                    }
                    Some(CSharpTokenKind::LeftBrace) => {
                        return Some(self.parse_property(modifiers));
                    }
                    Some(CSharpTokenKind::Semicolon) | Some(CSharpTokenKind::Operator) => {
                        return Some(self.parse_field(modifiers));
                    }
                    _ => {}
                }
            } else {
                self.tokens.restore_position(checkpoint);
            }
        }

        // Unclassifiable member: resynchronize at the next member boundary
        self.tokens.restore_position(checkpoint);
        self.skip_to_next_member();
        self.metrics.recoveries += 1;
        None
    }

    fn parse_method(&mut self, modifiers: Vec<CsToken>) -> CSharpNode {
        let start = self.member_start(&modifiers);

        let return_type = self.take_type_token();
        let name = self.take_identifier(SymbolRole::MethodName);

        let mut parameters = Vec::new();
        if self.at_kind(CSharpTokenKind::LeftParen) {
            self.tokens.advance();

            while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightParen) {
                let before = self.tokens.position();

                if let Some(param) = self.parse_parameter() {
                    parameters.push(param);
                }
                if self.at_kind(CSharpTokenKind::Comma) {
                    self.tokens.advance();
                }
                if self.tokens.position() == before {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }

            if self.at_kind(CSharpTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        let mut body = Vec::new();
        let end;
        if self.at_kind(CSharpTokenKind::LeftBrace) {
            let block = self.parse_block();
            end = block.1;
            body = block.0;
        } else {
            if self.at_kind(CSharpTokenKind::Semicolon) {
                self.tokens.advance();
            }
            end = self.last_consumed_end(start);
        }

        self.metrics.nodes_built += 1;
        CSharpNode::Method {
            modifiers,
            return_type,
            name,
            parameters,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_parameter(&mut self) -> Option<ParameterNode> {
        let first = self.tokens.current()?.clone();
        let start = first.span.start;

        // ref/out/params precede the type
        if matches!(first.text.as_str(), "ref" | "out" | "params")
            && first.kind == CSharpTokenKind::Keyword
        {
            self.tokens.advance();
        }

        let type_token = self.take_type_token();
        let name = self.take_identifier(SymbolRole::ParameterName);

        if self.at_operator_text("=") {
            self.skip_until(&[CSharpTokenKind::Comma, CSharpTokenKind::RightParen]);
        }

        if type_token.is_none() && name.is_none() {
            return None;
        }

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        Some(ParameterNode {
            type_token,
            name,
            span: Span::new(start, end),
        })
    }

    fn parse_property(&mut self, modifiers: Vec<CsToken>) -> CSharpNode {
        let start = self.member_start(&modifiers);

        let type_token = self.take_type_token();
        let name = self.take_identifier(SymbolRole::PropertyName);

        if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.tokens.advance();
            self.skip_balanced_to_right_brace();
        }

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        CSharpNode::Property {
            modifiers,
            type_token,
            name,
            span: Span::new(start, end),
        }
    }

    fn parse_field(&mut self, modifiers: Vec<CsToken>) -> CSharpNode {
        let start = self.member_start(&modifiers);

        let type_token = self.take_type_token();
        let name = self.take_identifier(SymbolRole::FieldName);

        self.skip_until(&[CSharpTokenKind::Semicolon]);
        let end = self.consume_current_end(start);

        self.metrics.nodes_built += 1;
        CSharpNode::Field {
            modifiers,
            type_token,
            name,
            span: Span::new(start, end),
        }
    }

    /// `{ statements }`; returns the statements and the end position
    fn parse_block(&mut self) -> (Vec<CSharpNode>, Position) {
        let start = self
            .tokens
            .current_span()
            .map(|s| s.start)
            .unwrap_or_default();
        self.tokens.advance(); // '{'

        let mut statements = Vec::new();
        while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightBrace) {
            let before = self.tokens.position();
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let end = self.consume_current_end(start);
        (statements, end)
    }

    fn parse_statement(&mut self) -> Option<CSharpNode> {
        if self.depth >= MAX_PARSE_DEPTH {
            self.metrics.depth_limit_hits += 1;
            self.tokens.advance();
            return None;
        }

        let token = self.tokens.current()?.clone();
        self.depth += 1;
        let node = self.parse_statement_inner(token);
        self.depth -= 1;
        node
    }

    fn parse_statement_inner(&mut self, token: CsToken) -> Option<CSharpNode> {
        // A freestanding `{ ... }` is a block statement of its own
        if token.kind == CSharpTokenKind::LeftBrace {
            let start = token.span.start;
            let (statements, end) = self.parse_block();
            self.metrics.nodes_built += 1;
            return Some(CSharpNode::Block {
                statements,
                span: Span::new(start, end),
            });
        }

        if token.kind == CSharpTokenKind::Keyword {
            match token.text.as_str() {
                "if" => return Some(self.parse_if(token)),
                "for" => return Some(self.parse_for(token)),
                "while" => return Some(self.parse_while(token)),
                "return" => return Some(self.parse_return(token)),
                _ if words::is_builtin_type_keyword(&token.text) => {
                    return Some(self.parse_variable_declaration());
                }
                _ => {}
            }
        }

        if token.kind == CSharpTokenKind::Identifier {
            // `Foo bar;` is a declaration; `bar();` is an expression
            // statement. Probe one identifier ahead and rewind.
            let checkpoint = self.tokens.save_position();
            self.tokens.advance();
            let second_identifier = self.at_kind(CSharpTokenKind::Identifier);
            self.tokens.restore_position(checkpoint);

            if second_identifier {
                return Some(self.parse_variable_declaration());
            }
            return self.parse_expression_statement();
        }

        self.parse_expression_statement()
    }

    fn parse_if(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // if

        let mut condition = None;
        if self.at_kind(CSharpTokenKind::LeftParen) {
            self.tokens.advance();
            condition = self.parse_expression().map(Box::new);
            self.skip_until(&[CSharpTokenKind::RightParen]);
            if self.at_kind(CSharpTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        let then_body = self.parse_branch_body();

        let mut else_body = Vec::new();
        if self.at_keyword_text("else") {
            self.tokens.advance();
            else_body = self.parse_branch_body();
        }

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        CSharpNode::If {
            keyword,
            condition,
            then_body,
            else_body,
            span: Span::new(start, end),
        }
    }

    /// A brace block or a single statement
    fn parse_branch_body(&mut self) -> Vec<CSharpNode> {
        if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.parse_block().0
        } else {
            let before = self.tokens.position();
            let stmt = self.parse_statement();
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
            stmt.into_iter().collect()
        }
    }

    fn parse_for(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // for

        if self.at_kind(CSharpTokenKind::LeftParen) {
            self.tokens.advance();
            self.skip_until(&[CSharpTokenKind::RightParen]);
            if self.at_kind(CSharpTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        let body = if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.parse_block().0
        } else {
            Vec::new()
        };

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        CSharpNode::For {
            keyword,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_while(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // while

        let mut condition = None;
        if self.at_kind(CSharpTokenKind::LeftParen) {
            self.tokens.advance();
            condition = self.parse_expression().map(Box::new);
            self.skip_until(&[CSharpTokenKind::RightParen]);
            if self.at_kind(CSharpTokenKind::RightParen) {
                self.tokens.advance();
            }
        }

        let body = if self.at_kind(CSharpTokenKind::LeftBrace) {
            self.parse_block().0
        } else {
            Vec::new()
        };

        let end = self.last_consumed_end(start);
        self.metrics.nodes_built += 1;
        CSharpNode::While {
            keyword,
            condition,
            body,
            span: Span::new(start, end),
        }
    }

    fn parse_return(&mut self, keyword: CsToken) -> CSharpNode {
        let start = keyword.span.start;
        self.tokens.advance(); // return

        let expression = if !self.at_kind(CSharpTokenKind::Semicolon) {
            self.parse_expression().map(Box::new)
        } else {
            None
        };

        self.skip_until(&[CSharpTokenKind::Semicolon]);
        let end = self.consume_current_end(start);

        self.metrics.nodes_built += 1;
        CSharpNode::Return {
            keyword,
            expression,
            span: Span::new(start, end),
        }
    }

    fn parse_variable_declaration(&mut self) -> CSharpNode {
        let start = self
            .tokens
            .current_span()
            .map(|s| s.start)
            .unwrap_or_default();

        let type_token = self.take_type_token();
        let name = self.take_identifier(SymbolRole::LocalVariable);

        let mut initializer = None;
        if self.at_operator_text("=") {
            self.tokens.advance();
            initializer = self.parse_expression().map(Box::new);
        }

        self.skip_until(&[CSharpTokenKind::Semicolon]);
        let end = self.consume_current_end(start);

        self.metrics.nodes_built += 1;
        CSharpNode::VariableDeclaration {
            type_token,
            name,
            initializer,
            span: Span::new(start, end),
        }
    }

    fn parse_expression_statement(&mut self) -> Option<CSharpNode> {
        let expr = self.parse_expression();
        self.skip_until(&[CSharpTokenKind::Semicolon]);
        if self.at_kind(CSharpTokenKind::Semicolon) {
            self.tokens.advance();
        }
        expr
    }

    fn parse_expression(&mut self) -> Option<CSharpNode> {
        let token = self.tokens.current()?.clone();

        match token.kind {
            CSharpTokenKind::String
            | CSharpTokenKind::Number
            | CSharpTokenKind::Character
            | CSharpTokenKind::Boolean
            | CSharpTokenKind::Null => {
                self.tokens.advance();
                self.metrics.nodes_built += 1;
                Some(CSharpNode::Literal { token })
            }
            CSharpTokenKind::Identifier => {
                let start = token.span.start;
                self.tokens.advance();

                if self.at_kind(CSharpTokenKind::LeftParen) {
                    return Some(self.parse_call(start, token));
                }

                self.metrics.nodes_built += 1;
                Some(CSharpNode::Symbol(SymbolNode::new(
                    token,
                    SymbolRole::Unknown,
                )))
            }
            _ => {
                self.tokens.advance();
                None
            }
        }
    }

    fn parse_call(&mut self, start: Position, name_token: CsToken) -> CSharpNode {
        let name = SymbolNode::new(name_token, SymbolRole::MethodCall);
        self.tokens.advance(); // '('

        let mut arguments = Vec::new();
        while !self.tokens.is_at_end() && !self.at_kind(CSharpTokenKind::RightParen) {
            let before = self.tokens.position();

            if let Some(arg) = self.parse_expression() {
                arguments.push(arg);
            }
            if self.at_kind(CSharpTokenKind::Comma) {
                self.tokens.advance();
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let end = self.consume_current_end(start);

        self.metrics.nodes_built += 1;
        CSharpNode::MethodCall {
            name,
            arguments,
            span: Span::new(start, end),
        }
    }

    fn parse_attribute(&mut self, token: CsToken) -> CSharpNode {
        let span = token.span;

        // Extract the attribute name from the bracketed run
        let name = token
            .text
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .map(|inner| {
                let inner = inner.trim();
                inner
                    .split_once('(')
                    .map(|(head, _)| head.trim())
                    .unwrap_or(inner)
                    .to_string()
            })
            .filter(|name| !name.is_empty())
            .map(|name| {
                SymbolNode::new(
                    Token::new(CSharpTokenKind::Identifier, name, span),
                    SymbolRole::AttributeName,
                )
            });

        self.tokens.advance();
        self.metrics.nodes_built += 1;
        CSharpNode::Attribute { name, span }
    }

    // === SHARED PIECES ===

    fn at_kind(&self, kind: CSharpTokenKind) -> bool {
        self.tokens.current_kind() == Some(kind)
    }

    fn at_keyword_text(&self, text: &str) -> bool {
        matches!(
            self.tokens.current(),
            Some(token) if token.kind == CSharpTokenKind::Keyword && token.text == text
        )
    }

    fn at_operator_text(&self, text: &str) -> bool {
        matches!(
            self.tokens.current(),
            Some(token) if token.kind == CSharpTokenKind::Operator && token.text == text
        )
    }

    fn at_modifier(&self) -> bool {
        matches!(
            self.tokens.current(),
            Some(token) if token.kind == CSharpTokenKind::Keyword && words::is_modifier(&token.text)
        )
    }

    fn take_modifiers(&mut self) -> Vec<CsToken> {
        let mut modifiers = Vec::new();
        while self.at_modifier() {
            if let Some(token) = self.tokens.current() {
                modifiers.push(token.clone());
            }
            self.tokens.advance();
        }
        modifiers
    }

    fn take_identifier(&mut self, role: SymbolRole) -> Option<SymbolNode> {
        let token = self.tokens.current()?.clone();
        if token.kind == CSharpTokenKind::Identifier {
            self.tokens.advance();
            Some(SymbolNode::new(token, role))
        } else {
            None
        }
    }

    /// A type position accepts identifiers and keywords (`int`, `string`)
    fn take_type_token(&mut self) -> Option<CsToken> {
        let token = self.tokens.current()?.clone();
        if matches!(
            token.kind,
            CSharpTokenKind::Identifier | CSharpTokenKind::Keyword
        ) {
            self.tokens.advance();
            Some(token)
        } else {
            None
        }
    }

    /// Assemble `A.B.C` into one synthesized name token positioned at the
    /// first segment
    fn take_dotted_name(&mut self, role: SymbolRole) -> Option<SymbolNode> {
        let first = self.tokens.current()?.clone();
        if first.kind != CSharpTokenKind::Identifier {
            return None;
        }

        let mut assembled = first.text.clone();
        let mut span = first.span;
        self.tokens.advance();

        while self.at_kind(CSharpTokenKind::Dot) {
            assembled.push('.');
            self.tokens.advance();

            if self.at_kind(CSharpTokenKind::Identifier) {
                if let Some(segment) = self.tokens.current() {
                    assembled.push_str(&segment.text);
                    span = span.merge(segment.span);
                }
                self.tokens.advance();
            }
        }

        Some(SymbolNode::new(
            Token::new(CSharpTokenKind::Identifier, assembled, span),
            role,
        ))
    }

    fn member_start(&self, modifiers: &[CsToken]) -> Position {
        modifiers
            .first()
            .map(|m| m.span.start)
            .or_else(|| self.tokens.current_span().map(|s| s.start))
            .unwrap_or_default()
    }

    fn skip_until(&mut self, kinds: &[CSharpTokenKind]) {
        while !self.tokens.is_at_end() {
            if let Some(kind) = self.tokens.current_kind() {
                if kinds.contains(&kind) {
                    break;
                }
            }
            self.tokens.advance();
        }
    }

    /// Skip forward to the next member boundary, tracking nested brace
    /// depth so a semicolon inside a nested block does not end the skip
    fn skip_to_next_member(&mut self) {
        let mut brace_depth: usize = 0;

        while !self.tokens.is_at_end() {
            match self.tokens.current_kind() {
                Some(CSharpTokenKind::LeftBrace) => brace_depth += 1,
                Some(CSharpTokenKind::RightBrace) => {
                    if brace_depth > 0 {
                        brace_depth -= 1;
                    } else {
                        break;
                    }
                }
                Some(CSharpTokenKind::Semicolon) if brace_depth == 0 => {
                    self.tokens.advance();
                    break;
                }
                _ => {}
            }
            self.tokens.advance();
        }
    }

    /// Skip a balanced `{ ... }` body whose opener is already consumed
    fn skip_balanced_to_right_brace(&mut self) {
        let mut depth: usize = 0;

        while !self.tokens.is_at_end() {
            match self.tokens.current_kind() {
                Some(CSharpTokenKind::LeftBrace) => depth += 1,
                Some(CSharpTokenKind::RightBrace) => {
                    if depth == 0 {
                        self.tokens.advance();
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.tokens.advance();
        }
    }

    /// Consume the current token and return its end position
    fn consume_current_end(&mut self, start: Position) -> Position {
        match self.tokens.current_span() {
            Some(span) => {
                self.tokens.advance();
                span.end
            }
            None => self.last_consumed_end(start),
        }
    }

    fn last_consumed_end(&self, start: Position) -> Position {
        self.tokens
            .previous_span()
            .map(|s| s.end)
            .filter(|end| end.offset >= start.offset)
            .unwrap_or(start)
    }
}

enum TypeKind {
    Class,
    Interface,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::CSharpLexer;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Vec<CSharpNode> {
        let tokens = CSharpLexer::new().tokenize(source);
        CSharpParser::new(tokens).parse()
    }

    #[test]
    fn test_using_directive() {
        let forest = parse("using System.Collections.Generic;\n");
        assert_matches!(&forest[0], CSharpNode::Using { name: Some(name), .. } => {
            assert_eq!(name.token.text, "System.Collections.Generic");
            assert_eq!(name.role, SymbolRole::NamespaceName);
        });
    }

    #[test]
    fn test_namespace_with_class() {
        let forest = parse("namespace App.Core { public class Engine { } }");
        assert_matches!(&forest[0], CSharpNode::Namespace { name: Some(name), members, .. } => {
            assert_eq!(name.token.text, "App.Core");
            assert_eq!(members.len(), 1);
            assert_matches!(&members[0], CSharpNode::Class { name: Some(class_name), modifiers, .. } => {
                assert_eq!(class_name.token.text, "Engine");
                assert_eq!(class_name.role, SymbolRole::ClassName);
                assert_eq!(modifiers.len(), 1);
                assert_eq!(modifiers[0].text, "public");
            });
        });
    }

    #[test]
    fn test_class_with_base_types() {
        let forest = parse("class Service : BaseService, IService { }");
        assert_matches!(&forest[0], CSharpNode::Class { base_types, .. } => {
            let names: Vec<_> = base_types.iter().map(|b| b.token.text.as_str()).collect();
            assert_eq!(names, vec!["BaseService", "IService"]);
            assert!(base_types.iter().all(|b| b.role == SymbolRole::TypeName));
        });
    }

    #[test]
    fn test_method_with_parameters_and_body() {
        let forest = parse("class C { public int Add(int a, int b) { return a; } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(&members[0], CSharpNode::Method {
                name: Some(name),
                return_type: Some(return_type),
                parameters,
                body,
                ..
            } => {
                assert_eq!(name.token.text, "Add");
                assert_eq!(name.role, SymbolRole::MethodName);
                assert_eq!(return_type.text, "int");
                assert_eq!(parameters.len(), 2);
                assert_eq!(parameters[0].name.as_ref().unwrap().token.text, "a");
                assert_eq!(
                    parameters[0].name.as_ref().unwrap().role,
                    SymbolRole::ParameterName
                );
                assert_eq!(body.len(), 1);
                assert_matches!(&body[0], CSharpNode::Return { expression: Some(_), .. });
            });
        });
    }

    #[test]
    fn test_property_and_field() {
        let forest = parse("class C { public string Name { get; set; } private int count; }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_eq!(members.len(), 2);
            assert_matches!(&members[0], CSharpNode::Property { name: Some(name), .. } => {
                assert_eq!(name.token.text, "Name");
                assert_eq!(name.role, SymbolRole::PropertyName);
            });
            assert_matches!(&members[1], CSharpNode::Field { name: Some(name), .. } => {
                assert_eq!(name.token.text, "count");
                assert_eq!(name.role, SymbolRole::FieldName);
            });
        });
    }

    #[test]
    fn test_declaration_vs_call_disambiguation() {
        // `Foo bar;` declares; `bar();` calls. The probe must leave no
        // residual cursor movement in either branch.
        let forest = parse("class C { void M() { Foo bar; bar(); } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(&members[0], CSharpNode::Method { body, .. } => {
                assert_eq!(body.len(), 2);
                assert_matches!(&body[0], CSharpNode::VariableDeclaration {
                    type_token: Some(type_token),
                    name: Some(name),
                    ..
                } => {
                    assert_eq!(type_token.text, "Foo");
                    assert_eq!(name.token.text, "bar");
                    assert_eq!(name.role, SymbolRole::LocalVariable);
                });
                assert_matches!(&body[1], CSharpNode::MethodCall { name, arguments, .. } => {
                    assert_eq!(name.token.text, "bar");
                    assert_eq!(name.role, SymbolRole::MethodCall);
                    assert!(arguments.is_empty());
                });
            });
        });
    }

    #[test]
    fn test_var_declaration_with_initializer() {
        let forest = parse("class C { void M() { var x = Compute(1, 2); } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(&members[0], CSharpNode::Method { body, .. } => {
                assert_matches!(&body[0], CSharpNode::VariableDeclaration {
                    initializer: Some(init),
                    ..
                } => {
                    assert_matches!(init.as_ref(), CSharpNode::MethodCall { arguments, .. } => {
                        assert_eq!(arguments.len(), 2);
                    });
                });
            });
        });
    }

    #[test]
    fn test_nested_block_statement() {
        let forest = parse("class C { void M() { { int x = 1; } Go(); } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(&members[0], CSharpNode::Method { body, .. } => {
                assert_eq!(body.len(), 2);
                assert_matches!(&body[0], CSharpNode::Block { statements, .. } => {
                    assert_eq!(statements.len(), 1);
                    assert_matches!(&statements[0], CSharpNode::VariableDeclaration { name: Some(name), .. } => {
                        assert_eq!(name.token.text, "x");
                    });
                });
                assert_matches!(&body[1], CSharpNode::MethodCall { .. });
            });
        });
    }

    #[test]
    fn test_if_else_statement() {
        let forest = parse("class C { void M() { if (ready) { Go(); } else { Stop(); } } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(&members[0], CSharpNode::Method { body, .. } => {
                assert_matches!(&body[0], CSharpNode::If { condition: Some(_), then_body, else_body, .. } => {
                    assert_eq!(then_body.len(), 1);
                    assert_eq!(else_body.len(), 1);
                });
            });
        });
    }

    #[test]
    fn test_enum_members() {
        let forest = parse("enum Color { Red, Green = 2, Blue }");
        assert_matches!(&forest[0], CSharpNode::Enum { members, .. } => {
            let names: Vec<_> = members.iter().map(|m| m.token.text.as_str()).collect();
            assert_eq!(names, vec!["Red", "Green", "Blue"]);
        });
    }

    #[test]
    fn test_attribute_name_extraction() {
        let forest = parse("[Serializable]\nclass C { }");
        assert_matches!(&forest[0], CSharpNode::Attribute { name: Some(name), .. } => {
            assert_eq!(name.token.text, "Serializable");
            assert_eq!(name.role, SymbolRole::AttributeName);
        });

        let forest = parse("[Route(\"api\")]\nclass C { }");
        assert_matches!(&forest[0], CSharpNode::Attribute { name: Some(name), .. } => {
            assert_eq!(name.token.text, "Route");
        });
    }

    #[test]
    fn test_span_containment() {
        let forest = parse(
            "namespace N { class C { int F(int a) { if (a) { return a; } return a; } } }",
        );

        fn check(node: &CSharpNode) {
            let span = node.span();
            for child in node.children() {
                assert!(
                    span.contains_span(&child.span()),
                    "child span {:?} escapes parent {:?}",
                    child.span(),
                    span
                );
                check(child);
            }
        }
        for node in &forest {
            check(node);
        }
    }

    #[test]
    fn test_unclassifiable_member_recovery() {
        // Garbage member must not break the members that follow it
        let forest = parse("class C { 42 37; public int Ok() { } }");
        assert_matches!(&forest[0], CSharpNode::Class { members, .. } => {
            assert_matches!(
                members.iter().find(|m| matches!(m, CSharpNode::Method { .. })),
                Some(CSharpNode::Method { name: Some(name), .. }) => {
                    assert_eq!(name.token.text, "Ok");
                }
            );
        });
    }

    #[test]
    fn test_truncated_class_terminates() {
        let forest = parse("public class Broken { public int X(");
        assert_eq!(forest.len(), 1);
        assert_matches!(&forest[0], CSharpNode::Class { name: Some(name), .. } => {
            assert_eq!(name.token.text, "Broken");
        });
    }
}
