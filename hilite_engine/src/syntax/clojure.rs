//! Recursive-descent parser for the Clojure-family language
//!
//! A list form dispatches on its head symbol: definition forms, binding
//! forms, conditionals, `fn`, and `ns` build dedicated nodes; any other
//! symbol head builds a call node; everything else is a generic list.
//! Symbol roles are tagged at the single point where the grammar knows the
//! name's purpose.

use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::ast::clojure::{BindingPair, ClojureNode, SymbolNode, SymbolRole};
use crate::grammar::keywords::clojure as forms;
use crate::logging::codes;
use crate::syntax::ParseMetrics;
use crate::tokens::{ClojureTokenKind, Token, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success};

/// Definition forms that take a parameter vector after the name
const PARAM_VECTOR_FORMS: &[&str] = &["defn", "defn-", "defmacro"];

type CToken = Token<ClojureTokenKind>;

/// Parser over a Clojure-family token stream
pub struct ClojureParser {
    tokens: TokenStream<ClojureTokenKind>,
    metrics: ParseMetrics,
    depth: usize,
}

impl ClojureParser {
    pub fn new(tokens: Vec<CToken>) -> Self {
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
    pub fn into_tokens(self) -> Vec<CToken> {
        self.tokens.into_tokens()
    }

    /// Parse the token stream into a forest of top-level nodes. Never
    /// fails: unparseable tokens are skipped and surrounding forms still
    /// produce nodes.
    pub fn parse(&mut self) -> Vec<ClojureNode> {
        log_debug!("Starting Clojure parse", "significant_tokens" => self.tokens.len());

        let mut forest = Vec::new();

        while !self.tokens.is_at_end() {
            let before = self.tokens.position();
            if let Some(node) = self.parse_expression() {
                forest.push(node);
            }
            // Forward progress even when nothing was recognized
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE,
            "Clojure parse completed",
            "top_level_nodes" => forest.len(),
            "nodes_built" => self.metrics.nodes_built,
            "tokens_skipped" => self.metrics.tokens_skipped
        );

        forest
    }

    fn parse_expression(&mut self) -> Option<ClojureNode> {
        if self.depth >= MAX_PARSE_DEPTH {
            self.metrics.depth_limit_hits += 1;
            self.tokens.advance();
            return None;
        }

        let token = self.tokens.current()?.clone();
        match token.kind {
            ClojureTokenKind::LeftParen => {
                self.depth += 1;
                let node = self.parse_list_form(&token);
                self.depth -= 1;
                node
            }
            ClojureTokenKind::LeftBracket => {
                self.depth += 1;
                let node =
                    self.parse_delimited(&token, ClojureTokenKind::RightBracket, Collection::Vector);
                self.depth -= 1;
                node
            }
            ClojureTokenKind::LeftBrace => {
                self.depth += 1;
                let node =
                    self.parse_delimited(&token, ClojureTokenKind::RightBrace, Collection::Map);
                self.depth -= 1;
                node
            }
            ClojureTokenKind::Dispatch => {
                self.depth += 1;
                let node = match token.text.as_str() {
                    // `#{` opens a set; `#(` an anonymous function body
                    "#{" => {
                        self.parse_delimited(&token, ClojureTokenKind::RightBrace, Collection::Map)
                    }
                    "#(" => {
                        self.parse_delimited(&token, ClojureTokenKind::RightParen, Collection::List)
                    }
                    // Other dispatch forms prefix the next expression
                    _ => {
                        self.tokens.advance();
                        self.parse_expression()
                    }
                };
                self.depth -= 1;
                node
            }
            ClojureTokenKind::Quote
            | ClojureTokenKind::Deref
            | ClojureTokenKind::Metadata
            | ClojureTokenKind::SyntaxQuote
            | ClojureTokenKind::Unquote
            | ClojureTokenKind::UnquoteSplicing => {
                // Reader macro applies to the following form; the prefix
                // token itself keeps its lexical color
                self.tokens.advance();
                self.depth += 1;
                let node = self.parse_expression();
                self.depth -= 1;
                node
            }
            ClojureTokenKind::String
            | ClojureTokenKind::Number
            | ClojureTokenKind::Character
            | ClojureTokenKind::Boolean
            | ClojureTokenKind::Nil
            | ClojureTokenKind::Keyword => {
                self.tokens.advance();
                self.metrics.nodes_built += 1;
                Some(ClojureNode::Literal { token })
            }
            ClojureTokenKind::Symbol => {
                self.tokens.advance();
                self.metrics.nodes_built += 1;
                Some(ClojureNode::Symbol(SymbolNode::new(
                    token,
                    SymbolRole::Unknown,
                )))
            }
            // Special forms outside head position keep their lexical color
            ClojureTokenKind::SpecialForm | ClojureTokenKind::Unknown => {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
                None
            }
            // Stray closers are the caller's concern
            ClojureTokenKind::RightParen
            | ClojureTokenKind::RightBracket
            | ClojureTokenKind::RightBrace
            | ClojureTokenKind::Whitespace
            | ClojureTokenKind::Comment
            | ClojureTokenKind::Eof => None,
        }
    }

    /// Dispatch a `(` form on its head token
    fn parse_list_form(&mut self, lparen: &CToken) -> Option<ClojureNode> {
        let start = lparen.span.start;
        self.tokens.advance(); // '('

        let head = match self.tokens.current() {
            Some(token) => token.clone(),
            None => {
                return Some(ClojureNode::List {
                    elements: Vec::new(),
                    span: self.close_span(start),
                })
            }
        };

        if head.kind == ClojureTokenKind::SpecialForm {
            let word = head.text.clone();
            if forms::is_definition_form(&word) {
                if PARAM_VECTOR_FORMS.contains(&word.as_str()) {
                    return Some(self.parse_defn(start, head));
                }
                return Some(self.parse_def(start, head));
            }
            if word == "fn" {
                return Some(self.parse_lambda(start, head));
            }
            if forms::is_binding_form(&word) {
                return Some(self.parse_let(start, head));
            }
            if forms::is_conditional_form(&word) {
                return Some(self.parse_if(start, head));
            }
            if word == "ns" {
                return Some(self.parse_namespace(start, head));
            }
            // Other special forms: generic list, head colored lexically
            return self.finish_list(start);
        }

        if head.kind == ClojureTokenKind::Symbol {
            return Some(self.parse_call(start, head));
        }

        self.finish_list(start)
    }

    fn parse_defn(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        let is_private = keyword.text == "defn-";
        self.tokens.advance(); // defn

        let name = self.take_name(SymbolRole::FunctionName);
        let docstring = self.take_docstring();
        let params = self.take_param_vector();
        let body = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Defn {
            keyword,
            name,
            docstring,
            params,
            body,
            is_private,
            span,
        }
    }

    fn parse_def(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        self.tokens.advance(); // def

        let name = self.take_name(SymbolRole::Variable);
        let docstring = self.take_docstring();

        let value = if !self.at_kind(ClojureTokenKind::RightParen) && !self.tokens.is_at_end() {
            self.parse_expression().map(Box::new)
        } else {
            None
        };

        // Anything left before the closer is malformed; drain it
        self.drain_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Def {
            keyword,
            name,
            docstring,
            value,
            span,
        }
    }

    fn parse_let(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        self.tokens.advance(); // let

        let mut bindings = Vec::new();
        if self.at_kind(ClojureTokenKind::LeftBracket) {
            self.tokens.advance(); // '['

            while !self.tokens.is_at_end() && !self.at_kind(ClojureTokenKind::RightBracket) {
                let before = self.tokens.position();

                let symbol = if self.at_kind(ClojureTokenKind::Symbol) {
                    let token = self.tokens.current().cloned();
                    self.tokens.advance();
                    token.map(|t| SymbolNode::new(t, SymbolRole::LocalBinding))
                } else {
                    None
                };

                let value = if !self.at_kind(ClojureTokenKind::RightBracket)
                    && !self.tokens.is_at_end()
                {
                    self.parse_expression().map(Box::new)
                } else {
                    None
                };

                if let Some(symbol) = symbol {
                    bindings.push(BindingPair { symbol, value });
                }

                if self.tokens.position() == before {
                    self.tokens.advance();
                    self.metrics.tokens_skipped += 1;
                }
            }

            if self.at_kind(ClojureTokenKind::RightBracket) {
                self.tokens.advance(); // ']'
            }
        }

        let body = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Let {
            keyword,
            bindings,
            body,
            span,
        }
    }

    fn parse_if(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        self.tokens.advance(); // if

        let condition = self.branch_expression();
        let then_branch = self.branch_expression();
        let else_branch = self.branch_expression();

        self.drain_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::If {
            keyword,
            condition,
            then_branch,
            else_branch,
            span,
        }
    }

    fn parse_lambda(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        self.tokens.advance(); // fn

        let params = self.take_param_vector();
        let body = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Lambda {
            keyword,
            params,
            body,
            span,
        }
    }

    fn parse_namespace(&mut self, start: Position, keyword: CToken) -> ClojureNode {
        self.tokens.advance(); // ns

        let name = self.take_name(SymbolRole::NamespaceAlias);
        let declarations = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Namespace {
            keyword,
            name,
            declarations,
            span,
        }
    }

    fn parse_call(&mut self, start: Position, head: CToken) -> ClojureNode {
        let callee = SymbolNode::new(head, SymbolRole::FunctionCall);
        self.tokens.advance(); // callee

        let arguments = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));

        self.metrics.nodes_built += 1;
        ClojureNode::Call {
            callee,
            arguments,
            span,
        }
    }

    /// Generic list after an unrecognized head (the opener is already
    /// consumed)
    fn finish_list(&mut self, start: Position) -> Option<ClojureNode> {
        let elements = self.parse_body_until_rparen();
        let span = Span::new(start, self.close_rparen(start));
        self.metrics.nodes_built += 1;
        Some(ClojureNode::List { elements, span })
    }

    /// Vector, map, or set body after the opener token
    fn parse_delimited(
        &mut self,
        opener: &CToken,
        closer: ClojureTokenKind,
        collection: Collection,
    ) -> Option<ClojureNode> {
        let start = opener.span.start;
        self.tokens.advance(); // opener

        let mut elements = Vec::new();
        while !self.tokens.is_at_end() && !self.at_kind(closer) {
            let before = self.tokens.position();
            if let Some(node) = self.parse_expression() {
                elements.push(node);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        let end = if self.at_kind(closer) {
            let end = self.tokens.current_span().map(|s| s.end);
            self.tokens.advance();
            end
        } else {
            None
        };
        let span = Span::new(start, end.unwrap_or_else(|| self.last_consumed_end(start)));

        self.metrics.nodes_built += 1;
        Some(match collection {
            Collection::Vector => ClojureNode::Vector { elements, span },
            Collection::Map => ClojureNode::Map { elements, span },
            Collection::List => ClojureNode::List { elements, span },
        })
    }

    // === SHARED PIECES ===

    fn at_kind(&self, kind: ClojureTokenKind) -> bool {
        self.tokens.current_kind() == Some(kind)
    }

    /// Take a name symbol if present (definition forms accept special-form
    /// names too, matching the symbol charset)
    fn take_name(&mut self, role: SymbolRole) -> Option<SymbolNode> {
        let token = self.tokens.current()?.clone();
        if matches!(
            token.kind,
            ClojureTokenKind::Symbol | ClojureTokenKind::SpecialForm
        ) {
            self.tokens.advance();
            Some(SymbolNode::new(token, role))
        } else {
            None
        }
    }

    /// Take a docstring if the next token is a string literal
    fn take_docstring(&mut self) -> Option<String> {
        let token = self.tokens.current()?;
        if token.kind == ClojureTokenKind::String {
            let text = token.text.clone();
            self.tokens.advance();
            Some(text)
        } else {
            None
        }
    }

    /// Take a `[param ...]` vector, tagging each symbol as a parameter
    fn take_param_vector(&mut self) -> Vec<SymbolNode> {
        let mut params = Vec::new();

        if self.at_kind(ClojureTokenKind::LeftBracket) {
            self.tokens.advance(); // '['

            while !self.tokens.is_at_end() && !self.at_kind(ClojureTokenKind::RightBracket) {
                if let Some(token) = self.tokens.current() {
                    if token.kind == ClojureTokenKind::Symbol {
                        params.push(SymbolNode::new(token.clone(), SymbolRole::Parameter));
                    }
                }
                self.tokens.advance();
            }

            if self.at_kind(ClojureTokenKind::RightBracket) {
                self.tokens.advance();
            }
        }

        params
    }

    /// One optional branch expression for conditional forms
    fn branch_expression(&mut self) -> Option<Box<ClojureNode>> {
        if self.tokens.is_at_end() || self.at_kind(ClojureTokenKind::RightParen) {
            return None;
        }
        let before = self.tokens.position();
        let node = self.parse_expression();
        if self.tokens.position() == before {
            self.tokens.advance();
            self.metrics.tokens_skipped += 1;
        }
        node.map(Box::new)
    }

    /// Parse expressions until the closing paren (not consumed here)
    fn parse_body_until_rparen(&mut self) -> Vec<ClojureNode> {
        let mut body = Vec::new();

        while !self.tokens.is_at_end() && !self.at_kind(ClojureTokenKind::RightParen) {
            let before = self.tokens.position();
            if let Some(node) = self.parse_expression() {
                body.push(node);
            }
            if self.tokens.position() == before {
                self.tokens.advance();
                self.metrics.tokens_skipped += 1;
            }
        }

        body
    }

    /// Drop tokens up to the closing paren during malformed-form recovery
    fn drain_until_rparen(&mut self) {
        let mut drained = false;
        while !self.tokens.is_at_end() && !self.at_kind(ClojureTokenKind::RightParen) {
            let before = self.tokens.position();
            let _ = self.parse_expression();
            if self.tokens.position() == before {
                self.tokens.advance();
            }
            drained = true;
        }
        if drained {
            self.metrics.recoveries += 1;
        }
    }

    /// Consume the closing paren if present and return the form's end
    /// position; on truncated input fall back to the last consumed token
    fn close_rparen(&mut self, start: Position) -> Position {
        if self.at_kind(ClojureTokenKind::RightParen) {
            let end = self
                .tokens
                .current_span()
                .map(|s| s.end)
                .unwrap_or(start);
            self.tokens.advance();
            end
        } else {
            self.last_consumed_end(start)
        }
    }

    fn close_span(&mut self, start: Position) -> Span {
        Span::new(start, self.close_rparen(start))
    }

    fn last_consumed_end(&self, start: Position) -> Position {
        self.tokens
            .previous_span()
            .map(|s| s.end)
            .filter(|end| end.offset >= start.offset)
            .unwrap_or(start)
    }
}

enum Collection {
    Vector,
    Map,
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::ClojureLexer;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> Vec<ClojureNode> {
        let tokens = ClojureLexer::new().tokenize(source);
        ClojureParser::new(tokens).parse()
    }

    #[test]
    fn test_defn_structure() {
        let forest = parse("(defn add \"sum\" [x y] (+ x y))");
        assert_eq!(forest.len(), 1);

        assert_matches!(&forest[0], ClojureNode::Defn {
            name: Some(name),
            docstring: Some(doc),
            params,
            body,
            is_private: false,
            ..
        } => {
            assert_eq!(name.token.text, "add");
            assert_eq!(name.role, SymbolRole::FunctionName);
            assert_eq!(doc, "\"sum\"");
            assert_eq!(params.len(), 2);
            assert_eq!(params[0].token.text, "x");
            assert_eq!(params[0].role, SymbolRole::Parameter);
            assert_eq!(body.len(), 1);
        });
    }

    #[test]
    fn test_private_defn() {
        let forest = parse("(defn- hidden [x] x)");
        assert_matches!(&forest[0], ClojureNode::Defn { is_private: true, .. });
    }

    #[test]
    fn test_def_with_value() {
        let forest = parse("(def answer 42)");
        assert_matches!(&forest[0], ClojureNode::Def {
            name: Some(name),
            value: Some(value),
            ..
        } => {
            assert_eq!(name.token.text, "answer");
            assert_eq!(name.role, SymbolRole::Variable);
            assert_matches!(value.as_ref(), ClojureNode::Literal { .. });
        });
    }

    #[test]
    fn test_let_bindings() {
        let forest = parse("(let [a 1 b (inc a)] (+ a b))");
        assert_matches!(&forest[0], ClojureNode::Let { bindings, body, .. } => {
            assert_eq!(bindings.len(), 2);
            assert_eq!(bindings[0].symbol.token.text, "a");
            assert_eq!(bindings[0].symbol.role, SymbolRole::LocalBinding);
            assert_matches!(
                bindings[1].value.as_deref(),
                Some(ClojureNode::Call { .. })
            );
            assert_eq!(body.len(), 1);
        });
    }

    #[test]
    fn test_if_branches() {
        let forest = parse("(if (pos? n) n 0)");
        assert_matches!(&forest[0], ClojureNode::If {
            condition: Some(condition),
            then_branch: Some(_),
            else_branch: Some(_),
            ..
        } => {
            assert_matches!(condition.as_ref(), ClojureNode::Call { callee, .. } => {
                assert_eq!(callee.token.text, "pos?");
                assert_eq!(callee.role, SymbolRole::FunctionCall);
            });
        });
    }

    #[test]
    fn test_namespace_form() {
        let forest = parse("(ns my.app (require [other.lib]))");
        assert_matches!(&forest[0], ClojureNode::Namespace { name: Some(name), declarations, .. } => {
            assert_eq!(name.token.text, "my.app");
            assert_eq!(name.role, SymbolRole::NamespaceAlias);
            assert_eq!(declarations.len(), 1);
        });
    }

    #[test]
    fn test_call_and_collections() {
        let forest = parse("(render [1 2] {:k v})");
        assert_matches!(&forest[0], ClojureNode::Call { callee, arguments, .. } => {
            assert_eq!(callee.token.text, "render");
            assert_eq!(arguments.len(), 2);
            assert_matches!(&arguments[0], ClojureNode::Vector { elements, .. } => {
                assert_eq!(elements.len(), 2);
            });
            assert_matches!(&arguments[1], ClojureNode::Map { .. });
        });
    }

    #[test]
    fn test_span_containment() {
        let source = "(defn f [x] (g (h x)))";
        let forest = parse(source);

        fn check(node: &ClojureNode) {
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
    fn test_unclosed_form_terminates() {
        let forest = parse("(defn broken [x] (inc x");
        assert_eq!(forest.len(), 1);
        assert_matches!(&forest[0], ClojureNode::Defn { name: Some(name), .. } => {
            assert_eq!(name.token.text, "broken");
        });
    }

    #[test]
    fn test_stray_closer_is_skipped() {
        let forest = parse(") (def x 1)");
        assert_eq!(forest.len(), 1);
        assert_matches!(&forest[0], ClojureNode::Def { .. });
    }

    #[test]
    fn test_reader_macro_prefixes() {
        let forest = parse("'(a b) @state");
        // Quote prefixes the list; deref prefixes the symbol
        assert_eq!(forest.len(), 2);
        assert_matches!(&forest[0], ClojureNode::Call { .. } | ClojureNode::List { .. });
        assert_matches!(&forest[1], ClojureNode::Symbol(_));
    }

    #[test]
    fn test_set_literal() {
        let forest = parse("#{1 2 3}");
        assert_matches!(&forest[0], ClojureNode::Map { elements, .. } => {
            assert_eq!(elements.len(), 3);
        });
    }

    #[test]
    fn test_deeply_nested_input_is_bounded() {
        let mut source = String::new();
        for _ in 0..300 {
            source.push('(');
        }
        source.push_str("x");
        // No closers at all; parser must terminate without overflow
        let forest = parse(&source);
        drop(forest);
    }
}
