//! Highlight resolution for the Fortran-family language
//!
//! Unit keywords and unit names carry emphasis, as do type keywords in
//! declaration position. Binding sites (declared variables, parameters,
//! loop variables, assignment targets) share one color; called names take
//! the call color whether they appear in call statements or expressions.

use crate::grammar::ast::fortran::{FortranNode, IdentifierRole};
use crate::grammar::keywords::FortranKeyword;
use crate::highlight::{emit_stream, palette, ColorMap, HighlightedToken, Style};
use crate::log_success;
use crate::logging::codes;
use crate::tokens::{FortranTokenKind, Token};

/// Walk the AST forest into a position-keyed style map, then emit one
/// highlighted token per non-EOF input token
pub fn resolve(
    forest: &[FortranNode],
    tokens: Vec<Token<FortranTokenKind>>,
) -> Vec<HighlightedToken<FortranTokenKind>> {
    let mut map = ColorMap::new(&tokens);

    for node in forest {
        assign_node(node, &mut map);
    }

    log_success!(codes::success::HIGHLIGHT_RESOLUTION_COMPLETE,
        "Fortran highlight resolution completed",
        "role_positions" => map.assigned_count(),
        "tokens" => tokens.len()
    );

    emit_stream(tokens, &map, fallback_style)
}

fn assign_node(node: &FortranNode, map: &mut ColorMap) {
    match node {
        FortranNode::Program {
            keyword,
            name,
            declarations,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_BLUE));
            }
            for decl in declarations {
                assign_node(decl, map);
            }
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        FortranNode::Subroutine {
            keyword,
            name,
            parameters,
            declarations,
            body,
            ..
        }
        | FortranNode::Function {
            keyword,
            name,
            parameters,
            declarations,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_BLUE));
            }
            for param in parameters {
                map.assign(param.token.offset(), Style::plain(palette::DARK_CYAN));
            }
            for decl in declarations {
                assign_node(decl, map);
            }
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        FortranNode::VariableDeclaration {
            type_keyword,
            variables,
            ..
        } => {
            map.assign(type_keyword.offset(), Style::bold(palette::BLUE));
            for variable in variables {
                map.assign(variable.token.offset(), Style::plain(palette::DARK_CYAN));
            }
        }

        FortranNode::DoLoop {
            keyword,
            variable,
            start,
            end,
            step,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(variable) = variable {
                map.assign(variable.token.offset(), Style::plain(palette::DARK_CYAN));
            }
            for bound in [start, end, step].into_iter().flatten() {
                assign_node(bound, map);
            }
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        FortranNode::If {
            keyword,
            condition,
            then_block,
            else_block,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(condition) = condition {
                assign_node(condition, map);
            }
            for stmt in then_block.iter().chain(else_block.iter()) {
                assign_node(stmt, map);
            }
        }

        FortranNode::CallStatement {
            keyword,
            name,
            arguments,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::DARK_MAGENTA));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::BLUE));
            }
            for arg in arguments {
                assign_node(arg, map);
            }
        }

        FortranNode::Assignment { target, value, .. } => {
            map.assign(target.token.offset(), Style::plain(palette::DARK_CYAN));
            if let Some(value) = value {
                assign_node(value, map);
            }
        }

        FortranNode::FunctionCall {
            callee, arguments, ..
        } => {
            map.assign(callee.token.offset(), Style::plain(palette::BLUE));
            for arg in arguments {
                assign_node(arg, map);
            }
        }

        FortranNode::BinaryExpression { left, right, .. } => {
            assign_node(left, map);
            if let Some(right) = right {
                assign_node(right, map);
            }
        }

        FortranNode::Identifier(identifier) => {
            let color = match identifier.role {
                IdentifierRole::ProgramName
                | IdentifierRole::SubroutineName
                | IdentifierRole::FunctionName => palette::DARK_BLUE,
                IdentifierRole::FunctionCall => palette::BLUE,
                IdentifierRole::VariableName
                | IdentifierRole::Parameter
                | IdentifierRole::LoopVariable => palette::DARK_CYAN,
                IdentifierRole::Unknown => palette::BLACK,
            };
            map.assign(identifier.token.offset(), Style::plain(color));
        }

        FortranNode::Literal { token } => {
            map.assign(token.offset(), fallback_style(token.kind));
        }
    }
}

/// Total per-category fallback table for positions no AST role claims.
/// Statement labels take the numeric color.
pub fn fallback_style(kind: FortranTokenKind) -> Style {
    Style::plain(match kind {
        FortranTokenKind::Comment => palette::GRAY,
        FortranTokenKind::String => palette::DARK_GREEN,
        FortranTokenKind::Integer | FortranTokenKind::Real | FortranTokenKind::Label => {
            palette::CYAN
        }
        FortranTokenKind::Logical => palette::PURPLE,
        FortranTokenKind::Keyword(kw) => keyword_fallback(kw),
        FortranTokenKind::Identifier => palette::BLACK,
        _ => palette::BLACK,
    })
}

fn keyword_fallback(keyword: FortranKeyword) -> &'static str {
    if keyword.is_statement_keyword() {
        palette::DARK_MAGENTA
    } else if keyword.is_declaration_keyword() {
        palette::BLUE
    } else {
        palette::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::FortranLexer;
    use crate::syntax::FortranParser;

    fn highlight(source: &str) -> Vec<HighlightedToken<FortranTokenKind>> {
        let tokens = FortranLexer::new().tokenize(source);
        let mut parser = FortranParser::new(tokens);
        let forest = parser.parse();
        resolve(&forest, parser.into_tokens())
    }

    fn style_of<'a>(
        stream: &'a [HighlightedToken<FortranTokenKind>],
        text: &str,
    ) -> &'a HighlightedToken<FortranTokenKind> {
        stream
            .iter()
            .find(|h| h.token.text == text)
            .unwrap_or_else(|| panic!("no token '{}'", text))
    }

    #[test]
    fn test_program_unit_coloring() {
        let stream = highlight("program demo\ninteger :: n\nn = 3\nend program demo");

        let keyword = style_of(&stream, "program");
        assert_eq!(keyword.color, palette::DARK_MAGENTA);
        assert!(keyword.bold);

        let name = style_of(&stream, "demo");
        assert_eq!(name.color, palette::DARK_BLUE);
        assert!(name.bold);

        let type_keyword = style_of(&stream, "integer");
        assert_eq!(type_keyword.color, palette::BLUE);
        assert!(type_keyword.bold);

        // Declared variable and assignment target share the binding color
        let variable = style_of(&stream, "n");
        assert_eq!(variable.color, palette::DARK_CYAN);
    }

    #[test]
    fn test_subroutine_parameters_and_call() {
        let stream = highlight(
            "subroutine swap(a, b)\ninteger :: a, b\nend subroutine\n\nprogram p\ncall swap(x, y)\nend program",
        );

        let param = style_of(&stream, "b");
        assert_eq!(param.color, palette::DARK_CYAN);

        let call = style_of(&stream, "call");
        assert_eq!(call.color, palette::DARK_MAGENTA);
        assert!(call.bold);

        // Second occurrence of "swap" is the called name
        let called: Vec<_> = stream.iter().filter(|h| h.token.text == "swap").collect();
        assert_eq!(called.len(), 2);
        assert_eq!(called[0].color, palette::DARK_BLUE);
        assert_eq!(called[1].color, palette::BLUE);
    }

    #[test]
    fn test_case_insensitive_keywords_color_identically() {
        for source in ["PROGRAM p\nEND", "Program p\nEnd", "program p\nend"] {
            let stream = highlight(source);
            let keyword = &stream[0];
            assert_eq!(keyword.color, palette::DARK_MAGENTA);
            assert!(keyword.bold);
        }
    }

    #[test]
    fn test_do_loop_variable_coloring() {
        let stream = highlight("program p\ndo i = 1, 10\nend do\nend program");

        let loop_kw = style_of(&stream, "do");
        assert_eq!(loop_kw.color, palette::DARK_MAGENTA);

        let variable = style_of(&stream, "i");
        assert_eq!(variable.color, palette::DARK_CYAN);

        let bound = style_of(&stream, "10");
        assert_eq!(bound.color, palette::CYAN);
    }

    #[test]
    fn test_comment_and_string_fallback() {
        let stream = highlight("! header\nprogram p\nprint *, 'hi'\nend");

        assert_eq!(style_of(&stream, "! header").color, palette::GRAY);
        assert_eq!(style_of(&stream, "'hi'").color, palette::DARK_GREEN);
    }

    #[test]
    fn test_keyword_fallback_groups() {
        assert_eq!(
            fallback_style(FortranTokenKind::Keyword(FortranKeyword::Return)).color,
            palette::DARK_MAGENTA
        );
        assert_eq!(
            fallback_style(FortranTokenKind::Keyword(FortranKeyword::Dimension)).color,
            palette::BLUE
        );
        assert_eq!(
            fallback_style(FortranTokenKind::Keyword(FortranKeyword::Format)).color,
            palette::BLACK
        );
    }
}
