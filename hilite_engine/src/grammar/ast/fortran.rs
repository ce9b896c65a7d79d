//! AST node definitions for the Fortran-family parser

use crate::tokens::{FortranTokenKind, Token};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Semantic role attached to an identifier leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierRole {
    Unknown,
    ProgramName,
    SubroutineName,
    FunctionName,
    FunctionCall,
    VariableName,
    Parameter,
    LoopVariable,
}

/// An identifier reference tagged with its role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierNode {
    pub token: Token<FortranTokenKind>,
    pub role: IdentifierRole,
}

impl IdentifierNode {
    pub fn new(token: Token<FortranTokenKind>, role: IdentifierRole) -> Self {
        Self { token, role }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

/// Fortran-family AST nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FortranNode {
    /// `program name ... end [program]`
    Program {
        keyword: Token<FortranTokenKind>,
        name: Option<IdentifierNode>,
        declarations: Vec<FortranNode>,
        body: Vec<FortranNode>,
        span: Span,
    },

    /// `subroutine name(params) ... end [subroutine]`
    Subroutine {
        keyword: Token<FortranTokenKind>,
        name: Option<IdentifierNode>,
        parameters: Vec<IdentifierNode>,
        declarations: Vec<FortranNode>,
        body: Vec<FortranNode>,
        span: Span,
    },

    /// `function name(params) ... end [function]`
    Function {
        keyword: Token<FortranTokenKind>,
        name: Option<IdentifierNode>,
        parameters: Vec<IdentifierNode>,
        declarations: Vec<FortranNode>,
        body: Vec<FortranNode>,
        span: Span,
    },

    /// `integer :: a, b(10), c`
    VariableDeclaration {
        type_keyword: Token<FortranTokenKind>,
        variables: Vec<IdentifierNode>,
        span: Span,
    },

    /// `do i = start, end [, step] ... enddo`
    DoLoop {
        keyword: Token<FortranTokenKind>,
        variable: Option<IdentifierNode>,
        start: Option<Box<FortranNode>>,
        end: Option<Box<FortranNode>>,
        step: Option<Box<FortranNode>>,
        body: Vec<FortranNode>,
        span: Span,
    },

    /// `if (cond) then ... [else ...] endif`
    If {
        keyword: Token<FortranTokenKind>,
        condition: Option<Box<FortranNode>>,
        then_block: Vec<FortranNode>,
        else_block: Vec<FortranNode>,
        span: Span,
    },

    /// `call name(args)`
    CallStatement {
        keyword: Token<FortranTokenKind>,
        name: Option<IdentifierNode>,
        arguments: Vec<FortranNode>,
        span: Span,
    },

    /// `target = expression`
    Assignment {
        target: IdentifierNode,
        value: Option<Box<FortranNode>>,
        span: Span,
    },

    /// `name(args)` in expression position
    FunctionCall {
        callee: IdentifierNode,
        arguments: Vec<FortranNode>,
        span: Span,
    },

    /// `left op right`, precedence-free and left-associative; the operator
    /// token keeps its lexical color
    BinaryExpression {
        left: Box<FortranNode>,
        right: Option<Box<FortranNode>>,
        span: Span,
    },

    /// An identifier in expression position
    Identifier(IdentifierNode),

    /// Integer, real, string, or logical literal
    Literal { token: Token<FortranTokenKind> },
}

impl FortranNode {
    /// Source span this node covers
    pub fn span(&self) -> Span {
        match self {
            Self::Program { span, .. }
            | Self::Subroutine { span, .. }
            | Self::Function { span, .. }
            | Self::VariableDeclaration { span, .. }
            | Self::DoLoop { span, .. }
            | Self::If { span, .. }
            | Self::CallStatement { span, .. }
            | Self::Assignment { span, .. }
            | Self::FunctionCall { span, .. }
            | Self::BinaryExpression { span, .. } => *span,
            Self::Identifier(id) => id.span(),
            Self::Literal { token } => token.span,
        }
    }

    /// Child nodes in natural left-to-right order
    pub fn children(&self) -> Vec<&FortranNode> {
        match self {
            Self::Program {
                declarations, body, ..
            }
            | Self::Subroutine {
                declarations, body, ..
            }
            | Self::Function {
                declarations, body, ..
            } => declarations.iter().chain(body.iter()).collect(),
            Self::VariableDeclaration { .. } => Vec::new(),
            Self::DoLoop {
                start,
                end,
                step,
                body,
                ..
            } => start
                .iter()
                .chain(end.iter())
                .chain(step.iter())
                .map(|b| b.as_ref())
                .chain(body.iter())
                .collect(),
            Self::If {
                condition,
                then_block,
                else_block,
                ..
            } => condition
                .iter()
                .map(|b| b.as_ref())
                .chain(then_block.iter())
                .chain(else_block.iter())
                .collect(),
            Self::CallStatement { arguments, .. } | Self::FunctionCall { arguments, .. } => {
                arguments.iter().collect()
            }
            Self::Assignment { value, .. } => value.iter().map(|b| b.as_ref()).collect(),
            Self::BinaryExpression { left, right, .. } => std::iter::once(left.as_ref())
                .chain(right.iter().map(|b| b.as_ref()))
                .collect(),
            Self::Identifier(_) | Self::Literal { .. } => Vec::new(),
        }
    }

    /// Whether this statement belongs in a unit's declaration section
    pub fn is_declaration(&self) -> bool {
        matches!(self, Self::VariableDeclaration { .. })
    }
}
