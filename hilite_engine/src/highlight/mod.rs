//! Highlight resolution module
//!
//! Two-phase design: a depth-first walk over the AST forest writes
//! role-based styles into a position-keyed color map, then a single pass
//! over the token list emits one highlighted token per non-EOF input token,
//! falling back to a per-category table for positions the tree never
//! claimed. Role styles always win over lexical fallback; both tables are
//! total, so this stage has no error path.

pub mod clojure;
pub mod csharp;
pub mod fortran;

use crate::tokens::{Token, TokenCategory};
use serde::Serialize;
use std::collections::HashMap;

/// Color names shared by the per-language tables
pub mod palette {
    pub const BLACK: &str = "Black";
    pub const BLUE: &str = "Blue";
    pub const CYAN: &str = "Cyan";
    pub const DARK_BLUE: &str = "DarkBlue";
    pub const DARK_CYAN: &str = "DarkCyan";
    pub const DARK_GRAY: &str = "DarkGray";
    pub const DARK_GREEN: &str = "DarkGreen";
    pub const DARK_MAGENTA: &str = "DarkMagenta";
    pub const DARK_RED: &str = "DarkRed";
    pub const GRAY: &str = "Gray";
    pub const GREEN: &str = "Green";
    pub const PURPLE: &str = "Purple";
    pub const WHITE: &str = "White";
    pub const YELLOW: &str = "Yellow";
}

/// A resolved color plus emphasis flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Style {
    pub color: &'static str,
    pub bold: bool,
}

impl Style {
    pub const fn plain(color: &'static str) -> Self {
        Self { color, bold: false }
    }

    pub const fn bold(color: &'static str) -> Self {
        Self { color, bold: true }
    }
}

/// One output token with its resolved rendering attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedToken<K> {
    pub token: Token<K>,
    pub color: &'static str,
    pub bold: bool,
}

/// Position-keyed style table. Styles live in an array indexed by token
/// index; byte offsets resolve to indices through a lookup built once per
/// request, since every token offset is known up front.
#[derive(Debug)]
pub struct ColorMap {
    styles: Vec<Option<Style>>,
    index_by_offset: HashMap<usize, usize>,
}

impl ColorMap {
    /// Build an empty map sized for the given token list
    pub fn new<K: TokenCategory>(tokens: &[Token<K>]) -> Self {
        Self {
            styles: vec![None; tokens.len()],
            index_by_offset: tokens
                .iter()
                .enumerate()
                .map(|(index, token)| (token.offset(), index))
                .collect(),
        }
    }

    /// Assign a style to the token starting at the given byte offset.
    /// Unknown offsets (synthesized nodes) are ignored.
    pub fn assign(&mut self, offset: usize, style: Style) {
        if let Some(&index) = self.index_by_offset.get(&offset) {
            self.styles[index] = Some(style);
        }
    }

    /// Style assigned to the token at this index, if any
    pub fn get(&self, index: usize) -> Option<Style> {
        self.styles.get(index).copied().flatten()
    }

    /// Number of positions holding an assigned style
    pub fn assigned_count(&self) -> usize {
        self.styles.iter().filter(|s| s.is_some()).count()
    }
}

/// Emit the final stream: one entry per non-EOF token, role style when the
/// map claims the position, lexical fallback otherwise
pub fn emit_stream<K, F>(
    tokens: Vec<Token<K>>,
    map: &ColorMap,
    fallback: F,
) -> Vec<HighlightedToken<K>>
where
    K: TokenCategory,
    F: Fn(K) -> Style,
{
    tokens
        .into_iter()
        .enumerate()
        .filter(|(_, token)| !token.is_eof())
        .map(|(index, token)| {
            let style = map.get(index).unwrap_or_else(|| fallback(token.kind));
            HighlightedToken {
                token,
                color: style.color,
                bold: style.bold,
            }
        })
        .collect()
}
