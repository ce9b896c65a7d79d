//! AST node definitions for the C-family parser

use crate::tokens::{CSharpTokenKind, Token};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Semantic role attached to a symbol leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolRole {
    Unknown,
    NamespaceName,
    ClassName,
    InterfaceName,
    EnumName,
    TypeName,
    MethodName,
    MethodCall,
    PropertyName,
    FieldName,
    ParameterName,
    LocalVariable,
    AttributeName,
}

/// A symbol reference tagged with its role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolNode {
    pub token: Token<CSharpTokenKind>,
    pub role: SymbolRole,
}

impl SymbolNode {
    pub fn new(token: Token<CSharpTokenKind>, role: SymbolRole) -> Self {
        Self { token, role }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

/// A method parameter: type token plus role-tagged name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub type_token: Option<Token<CSharpTokenKind>>,
    pub name: Option<SymbolNode>,
    pub span: Span,
}

/// C-family AST nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CSharpNode {
    /// `using Dotted.Namespace.Path;`
    Using {
        keyword: Token<CSharpTokenKind>,
        name: Option<SymbolNode>,
        span: Span,
    },

    /// `namespace Name { members }`
    Namespace {
        keyword: Token<CSharpTokenKind>,
        name: Option<SymbolNode>,
        members: Vec<CSharpNode>,
        span: Span,
    },

    /// `modifiers class Name : Base, IFace { members }`
    Class {
        modifiers: Vec<Token<CSharpTokenKind>>,
        keyword: Token<CSharpTokenKind>,
        name: Option<SymbolNode>,
        base_types: Vec<SymbolNode>,
        members: Vec<CSharpNode>,
        span: Span,
    },

    /// `modifiers interface Name : Base { members }`
    Interface {
        modifiers: Vec<Token<CSharpTokenKind>>,
        keyword: Token<CSharpTokenKind>,
        name: Option<SymbolNode>,
        base_types: Vec<SymbolNode>,
        members: Vec<CSharpNode>,
        span: Span,
    },

    /// `modifiers enum Name { A, B = 1, C }`
    Enum {
        modifiers: Vec<Token<CSharpTokenKind>>,
        keyword: Token<CSharpTokenKind>,
        name: Option<SymbolNode>,
        members: Vec<SymbolNode>,
        span: Span,
    },

    /// `modifiers ReturnType Name(params) { body }`
    Method {
        modifiers: Vec<Token<CSharpTokenKind>>,
        return_type: Option<Token<CSharpTokenKind>>,
        name: Option<SymbolNode>,
        parameters: Vec<ParameterNode>,
        body: Vec<CSharpNode>,
        span: Span,
    },

    /// `modifiers Type Name { get; set; }`
    Property {
        modifiers: Vec<Token<CSharpTokenKind>>,
        type_token: Option<Token<CSharpTokenKind>>,
        name: Option<SymbolNode>,
        span: Span,
    },

    /// `modifiers Type name;`
    Field {
        modifiers: Vec<Token<CSharpTokenKind>>,
        type_token: Option<Token<CSharpTokenKind>>,
        name: Option<SymbolNode>,
        span: Span,
    },

    /// `Type name = initializer;` in statement position
    VariableDeclaration {
        type_token: Option<Token<CSharpTokenKind>>,
        name: Option<SymbolNode>,
        initializer: Option<Box<CSharpNode>>,
        span: Span,
    },

    /// `if (cond) { then } else { else }`
    If {
        keyword: Token<CSharpTokenKind>,
        condition: Option<Box<CSharpNode>>,
        then_body: Vec<CSharpNode>,
        else_body: Vec<CSharpNode>,
        span: Span,
    },

    /// `for (...) { body }` (header tokens colored by fallback)
    For {
        keyword: Token<CSharpTokenKind>,
        body: Vec<CSharpNode>,
        span: Span,
    },

    /// `while (cond) { body }`
    While {
        keyword: Token<CSharpTokenKind>,
        condition: Option<Box<CSharpNode>>,
        body: Vec<CSharpNode>,
        span: Span,
    },

    /// `return expr?;`
    Return {
        keyword: Token<CSharpTokenKind>,
        expression: Option<Box<CSharpNode>>,
        span: Span,
    },

    /// `{ statements }`
    Block { statements: Vec<CSharpNode>, span: Span },

    /// `name(args)` in expression position
    MethodCall {
        name: SymbolNode,
        arguments: Vec<CSharpNode>,
        span: Span,
    },

    /// `[AttrName(...)]` with the name extracted from the bracketed run
    Attribute { name: Option<SymbolNode>, span: Span },

    /// An identifier in expression position
    Symbol(SymbolNode),

    /// String, number, character, boolean, or null literal
    Literal { token: Token<CSharpTokenKind> },
}

impl CSharpNode {
    /// Source span this node covers
    pub fn span(&self) -> Span {
        match self {
            Self::Using { span, .. }
            | Self::Namespace { span, .. }
            | Self::Class { span, .. }
            | Self::Interface { span, .. }
            | Self::Enum { span, .. }
            | Self::Method { span, .. }
            | Self::Property { span, .. }
            | Self::Field { span, .. }
            | Self::VariableDeclaration { span, .. }
            | Self::If { span, .. }
            | Self::For { span, .. }
            | Self::While { span, .. }
            | Self::Return { span, .. }
            | Self::Block { span, .. }
            | Self::MethodCall { span, .. }
            | Self::Attribute { span, .. } => *span,
            Self::Symbol(sym) => sym.span(),
            Self::Literal { token } => token.span,
        }
    }

    /// Child nodes in natural left-to-right order
    pub fn children(&self) -> Vec<&CSharpNode> {
        match self {
            Self::Namespace { members, .. }
            | Self::Class { members, .. }
            | Self::Interface { members, .. } => members.iter().collect(),
            Self::Method { body, .. } | Self::For { body, .. } => body.iter().collect(),
            Self::VariableDeclaration { initializer, .. } => {
                initializer.iter().map(|b| b.as_ref()).collect()
            }
            Self::If {
                condition,
                then_body,
                else_body,
                ..
            } => condition
                .iter()
                .map(|b| b.as_ref())
                .chain(then_body.iter())
                .chain(else_body.iter())
                .collect(),
            Self::While { condition, body, .. } => condition
                .iter()
                .map(|b| b.as_ref())
                .chain(body.iter())
                .collect(),
            Self::Return { expression, .. } => expression.iter().map(|b| b.as_ref()).collect(),
            Self::Block { statements, .. } => statements.iter().collect(),
            Self::MethodCall { arguments, .. } => arguments.iter().collect(),
            Self::Using { .. }
            | Self::Enum { .. }
            | Self::Property { .. }
            | Self::Field { .. }
            | Self::Attribute { .. }
            | Self::Symbol(_)
            | Self::Literal { .. } => Vec::new(),
        }
    }
}
