//! Highlight resolution for the Clojure-family language
//!
//! Definition keywords and definition names carry emphasis; parameters and
//! let-bindings share one color so binding sites read uniformly. Reader
//! macro prefixes and special forms outside head position keep their
//! lexical fallback color.

use crate::grammar::ast::clojure::{ClojureNode, SymbolRole};
use crate::highlight::{emit_stream, palette, ColorMap, HighlightedToken, Style};
use crate::log_success;
use crate::logging::codes;
use crate::tokens::{ClojureTokenKind, Token};

/// Walk the AST forest into a position-keyed style map, then emit one
/// highlighted token per non-EOF input token
pub fn resolve(
    forest: &[ClojureNode],
    tokens: Vec<Token<ClojureTokenKind>>,
) -> Vec<HighlightedToken<ClojureTokenKind>> {
    let mut map = ColorMap::new(&tokens);

    for node in forest {
        assign_node(node, &mut map);
    }

    log_success!(codes::success::HIGHLIGHT_RESOLUTION_COMPLETE,
        "Clojure highlight resolution completed",
        "role_positions" => map.assigned_count(),
        "tokens" => tokens.len()
    );

    emit_stream(tokens, &map, fallback_style)
}

fn assign_node(node: &ClojureNode, map: &mut ColorMap) {
    match node {
        ClojureNode::Defn {
            keyword,
            name,
            params,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_BLUE));
            }
            for param in params {
                map.assign(param.token.offset(), Style::plain(palette::DARK_CYAN));
            }
            for expr in body {
                assign_node(expr, map);
            }
        }

        ClojureNode::Def {
            keyword,
            name,
            value,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_BLUE));
            }
            if let Some(value) = value {
                assign_node(value, map);
            }
        }

        ClojureNode::Let {
            keyword,
            bindings,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            for binding in bindings {
                map.assign(
                    binding.symbol.token.offset(),
                    Style::plain(palette::DARK_CYAN),
                );
                if let Some(value) = &binding.value {
                    assign_node(value, map);
                }
            }
            for expr in body {
                assign_node(expr, map);
            }
        }

        ClojureNode::If {
            keyword,
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            for branch in [condition, then_branch, else_branch].into_iter().flatten() {
                assign_node(branch, map);
            }
        }

        ClojureNode::Lambda {
            keyword,
            params,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            for param in params {
                map.assign(param.token.offset(), Style::plain(palette::DARK_CYAN));
            }
            for expr in body {
                assign_node(expr, map);
            }
        }

        ClojureNode::Namespace {
            keyword,
            name,
            declarations,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_BLUE));
            }
            for decl in declarations {
                assign_node(decl, map);
            }
        }

        ClojureNode::Call {
            callee, arguments, ..
        } => {
            map.assign(callee.token.offset(), Style::plain(palette::BLUE));
            for arg in arguments {
                assign_node(arg, map);
            }
        }

        ClojureNode::List { elements, .. }
        | ClojureNode::Vector { elements, .. }
        | ClojureNode::Map { elements, .. } => {
            for element in elements {
                assign_node(element, map);
            }
        }

        ClojureNode::Symbol(symbol) => {
            let color = match symbol.role {
                SymbolRole::FunctionName => palette::DARK_BLUE,
                SymbolRole::FunctionCall => palette::BLUE,
                SymbolRole::Parameter | SymbolRole::LocalBinding => palette::DARK_CYAN,
                SymbolRole::Variable | SymbolRole::NamespaceAlias => palette::DARK_BLUE,
                SymbolRole::Macro => palette::DARK_MAGENTA,
                SymbolRole::Unknown => palette::BLACK,
            };
            let style = if symbol.role == SymbolRole::FunctionName {
                Style::bold(color)
            } else {
                Style::plain(color)
            };
            map.assign(symbol.token.offset(), style);
        }

        ClojureNode::Literal { token } => {
            map.assign(token.offset(), fallback_style(token.kind));
        }
    }
}

/// Total per-category fallback table for positions no AST role claims
pub fn fallback_style(kind: ClojureTokenKind) -> Style {
    Style::plain(match kind {
        ClojureTokenKind::Comment => palette::GRAY,
        ClojureTokenKind::String | ClojureTokenKind::Character => palette::DARK_GREEN,
        ClojureTokenKind::Number => palette::CYAN,
        ClojureTokenKind::Keyword => palette::BLUE,
        ClojureTokenKind::Boolean | ClojureTokenKind::Nil => palette::PURPLE,
        ClojureTokenKind::SpecialForm => palette::DARK_MAGENTA,
        ClojureTokenKind::Symbol => palette::BLACK,
        ClojureTokenKind::Quote
        | ClojureTokenKind::Deref
        | ClojureTokenKind::Metadata
        | ClojureTokenKind::SyntaxQuote
        | ClojureTokenKind::Unquote
        | ClojureTokenKind::UnquoteSplicing
        | ClojureTokenKind::Dispatch => palette::DARK_RED,
        _ => palette::BLACK,
    })
}
