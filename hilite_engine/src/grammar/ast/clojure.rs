//! AST node definitions for the Clojure-family parser
//!
//! One closed enum covers every production the parser can build, so the
//! highlight resolver's traversal is exhaustiveness-checked: adding a node
//! kind is a compile-time-visible, single-point change.

use crate::tokens::{ClojureTokenKind, Token};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Semantic role attached to a symbol leaf at the single point where the
/// grammar determines the name's purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolRole {
    Unknown,
    FunctionName,
    FunctionCall,
    Parameter,
    LocalBinding,
    NamespaceAlias,
    Macro,
    Variable,
}

/// A symbol reference tagged with its role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolNode {
    pub token: Token<ClojureTokenKind>,
    pub role: SymbolRole,
}

impl SymbolNode {
    pub fn new(token: Token<ClojureTokenKind>, role: SymbolRole) -> Self {
        Self { token, role }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

/// A name/value pair inside a binding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingPair {
    pub symbol: SymbolNode,
    pub value: Option<Box<ClojureNode>>,
}

/// Clojure-family AST nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClojureNode {
    /// `(defn name "doc"? [params] body...)`, also `defn-` and the other
    /// definition forms that take a parameter vector
    Defn {
        keyword: Token<ClojureTokenKind>,
        name: Option<SymbolNode>,
        docstring: Option<String>,
        params: Vec<SymbolNode>,
        body: Vec<ClojureNode>,
        is_private: bool,
        span: Span,
    },

    /// `(def name "doc"? value?)`
    Def {
        keyword: Token<ClojureTokenKind>,
        name: Option<SymbolNode>,
        docstring: Option<String>,
        value: Option<Box<ClojureNode>>,
        span: Span,
    },

    /// `(let [sym val ...] body...)` and the other binding forms
    Let {
        keyword: Token<ClojureTokenKind>,
        bindings: Vec<BindingPair>,
        body: Vec<ClojureNode>,
        span: Span,
    },

    /// `(if cond then else?)` and the other conditional forms
    If {
        keyword: Token<ClojureTokenKind>,
        condition: Option<Box<ClojureNode>>,
        then_branch: Option<Box<ClojureNode>>,
        else_branch: Option<Box<ClojureNode>>,
        span: Span,
    },

    /// `(fn [params] body...)`
    Lambda {
        keyword: Token<ClojureTokenKind>,
        params: Vec<SymbolNode>,
        body: Vec<ClojureNode>,
        span: Span,
    },

    /// `(ns name declarations...)`
    Namespace {
        keyword: Token<ClojureTokenKind>,
        name: Option<SymbolNode>,
        declarations: Vec<ClojureNode>,
        span: Span,
    },

    /// `(callee args...)` where the head is an ordinary symbol
    Call {
        callee: SymbolNode,
        arguments: Vec<ClojureNode>,
        span: Span,
    },

    /// A list whose head is not a symbol (or an empty list)
    List { elements: Vec<ClojureNode>, span: Span },

    /// `[elements...]`
    Vector { elements: Vec<ClojureNode>, span: Span },

    /// `{k v ...}` or `#{...}`
    Map { elements: Vec<ClojureNode>, span: Span },

    /// A symbol in expression position
    Symbol(SymbolNode),

    /// String, number, character, boolean, nil, or keyword literal
    Literal { token: Token<ClojureTokenKind> },
}

impl ClojureNode {
    /// Source span this node covers
    pub fn span(&self) -> Span {
        match self {
            Self::Defn { span, .. }
            | Self::Def { span, .. }
            | Self::Let { span, .. }
            | Self::If { span, .. }
            | Self::Lambda { span, .. }
            | Self::Namespace { span, .. }
            | Self::Call { span, .. }
            | Self::List { span, .. }
            | Self::Vector { span, .. }
            | Self::Map { span, .. } => *span,
            Self::Symbol(sym) => sym.span(),
            Self::Literal { token } => token.span,
        }
    }

    /// Child nodes in natural left-to-right order
    pub fn children(&self) -> Vec<&ClojureNode> {
        match self {
            Self::Defn { body, .. } | Self::Lambda { body, .. } => body.iter().collect(),
            Self::Def { value, .. } => value.iter().map(|b| b.as_ref()).collect(),
            Self::Let { bindings, body, .. } => bindings
                .iter()
                .filter_map(|b| b.value.as_deref())
                .chain(body.iter())
                .collect(),
            Self::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => condition
                .iter()
                .chain(then_branch.iter())
                .chain(else_branch.iter())
                .map(|b| b.as_ref())
                .collect(),
            Self::Namespace { declarations, .. } => declarations.iter().collect(),
            Self::Call { arguments, .. } => arguments.iter().collect(),
            Self::List { elements, .. }
            | Self::Vector { elements, .. }
            | Self::Map { elements, .. } => elements.iter().collect(),
            Self::Symbol(_) | Self::Literal { .. } => Vec::new(),
        }
    }
}
