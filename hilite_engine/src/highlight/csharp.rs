//! Highlight resolution for the C-family language
//!
//! Control keywords take one color, declaration modifiers and type keywords
//! another; type names carry emphasis. Method names and method calls share
//! the member color so definitions and uses read the same. Namespace paths
//! stay unemphasized.

use crate::grammar::ast::csharp::{CSharpNode, ParameterNode, SymbolRole};
use crate::highlight::{emit_stream, palette, ColorMap, HighlightedToken, Style};
use crate::log_success;
use crate::logging::codes;
use crate::tokens::{CSharpTokenKind, Token};

/// Walk the AST forest into a position-keyed style map, then emit one
/// highlighted token per non-EOF input token
pub fn resolve(
    forest: &[CSharpNode],
    tokens: Vec<Token<CSharpTokenKind>>,
) -> Vec<HighlightedToken<CSharpTokenKind>> {
    let mut map = ColorMap::new(&tokens);

    for node in forest {
        assign_node(node, &mut map);
    }

    log_success!(codes::success::HIGHLIGHT_RESOLUTION_COMPLETE,
        "C-family highlight resolution completed",
        "role_positions" => map.assigned_count(),
        "tokens" => tokens.len()
    );

    emit_stream(tokens, &map, fallback_style)
}

fn assign_node(node: &CSharpNode, map: &mut ColorMap) {
    match node {
        CSharpNode::Using { keyword, name, .. } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::BLACK));
            }
        }

        CSharpNode::Namespace {
            keyword,
            name,
            members,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::BLACK));
            }
            for member in members {
                assign_node(member, map);
            }
        }

        CSharpNode::Class {
            modifiers,
            keyword,
            name,
            base_types,
            members,
            ..
        }
        | CSharpNode::Interface {
            modifiers,
            keyword,
            name,
            base_types,
            members,
            ..
        } => {
            for modifier in modifiers {
                map.assign(modifier.offset(), Style::bold(palette::BLUE));
            }
            map.assign(keyword.offset(), Style::bold(palette::BLUE));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_CYAN));
            }
            for base in base_types {
                map.assign(base.token.offset(), Style::plain(palette::DARK_CYAN));
            }
            for member in members {
                assign_node(member, map);
            }
        }

        CSharpNode::Enum {
            modifiers,
            keyword,
            name,
            members,
            ..
        } => {
            for modifier in modifiers {
                map.assign(modifier.offset(), Style::bold(palette::BLUE));
            }
            map.assign(keyword.offset(), Style::bold(palette::BLUE));
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::bold(palette::DARK_CYAN));
            }
            for member in members {
                map.assign(member.token.offset(), Style::plain(palette::DARK_GRAY));
            }
        }

        CSharpNode::Method {
            modifiers,
            return_type,
            name,
            parameters,
            body,
            ..
        } => {
            for modifier in modifiers {
                map.assign(modifier.offset(), Style::bold(palette::BLUE));
            }
            if let Some(return_type) = return_type {
                map.assign(return_type.offset(), Style::plain(palette::BLUE));
            }
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::YELLOW));
            }
            for param in parameters {
                assign_parameter(param, map);
            }
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        CSharpNode::Property {
            modifiers,
            type_token,
            name,
            ..
        }
        | CSharpNode::Field {
            modifiers,
            type_token,
            name,
            ..
        } => {
            for modifier in modifiers {
                map.assign(modifier.offset(), Style::bold(palette::BLUE));
            }
            if let Some(type_token) = type_token {
                map.assign(type_token.offset(), Style::plain(palette::BLUE));
            }
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::WHITE));
            }
        }

        CSharpNode::VariableDeclaration {
            type_token,
            name,
            initializer,
            ..
        } => {
            if let Some(type_token) = type_token {
                map.assign(type_token.offset(), Style::plain(palette::BLUE));
            }
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::WHITE));
            }
            if let Some(initializer) = initializer {
                assign_node(initializer, map);
            }
        }

        CSharpNode::If {
            keyword,
            condition,
            then_body,
            else_body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            if let Some(condition) = condition {
                assign_node(condition, map);
            }
            for stmt in then_body.iter().chain(else_body.iter()) {
                assign_node(stmt, map);
            }
        }

        CSharpNode::For { keyword, body, .. } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        CSharpNode::While {
            keyword,
            condition,
            body,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            if let Some(condition) = condition {
                assign_node(condition, map);
            }
            for stmt in body {
                assign_node(stmt, map);
            }
        }

        CSharpNode::Return {
            keyword,
            expression,
            ..
        } => {
            map.assign(keyword.offset(), Style::bold(palette::PURPLE));
            if let Some(expression) = expression {
                assign_node(expression, map);
            }
        }

        CSharpNode::Block { statements, .. } => {
            for stmt in statements {
                assign_node(stmt, map);
            }
        }

        CSharpNode::MethodCall {
            name, arguments, ..
        } => {
            map.assign(name.token.offset(), Style::plain(palette::YELLOW));
            for arg in arguments {
                assign_node(arg, map);
            }
        }

        CSharpNode::Attribute { name, .. } => {
            if let Some(name) = name {
                map.assign(name.token.offset(), Style::plain(palette::GRAY));
            }
        }

        CSharpNode::Symbol(symbol) => {
            let color = match symbol.role {
                SymbolRole::ClassName
                | SymbolRole::InterfaceName
                | SymbolRole::EnumName
                | SymbolRole::TypeName => palette::DARK_CYAN,
                SymbolRole::MethodName | SymbolRole::MethodCall => palette::YELLOW,
                SymbolRole::PropertyName
                | SymbolRole::FieldName
                | SymbolRole::LocalVariable => palette::WHITE,
                SymbolRole::ParameterName => palette::DARK_GRAY,
                SymbolRole::NamespaceName => palette::BLACK,
                SymbolRole::AttributeName => palette::GRAY,
                SymbolRole::Unknown => palette::WHITE,
            };
            let bold = matches!(
                symbol.role,
                SymbolRole::ClassName | SymbolRole::InterfaceName | SymbolRole::EnumName
            );
            map.assign(symbol.token.offset(), Style { color, bold });
        }

        CSharpNode::Literal { token } => {
            map.assign(token.offset(), fallback_style(token.kind));
        }
    }
}

fn assign_parameter(param: &ParameterNode, map: &mut ColorMap) {
    if let Some(type_token) = &param.type_token {
        map.assign(type_token.offset(), Style::plain(palette::BLUE));
    }
    if let Some(name) = &param.name {
        map.assign(name.token.offset(), Style::plain(palette::DARK_GRAY));
    }
}

/// Total per-category fallback table for positions no AST role claims
pub fn fallback_style(kind: CSharpTokenKind) -> Style {
    Style::plain(match kind {
        CSharpTokenKind::Keyword | CSharpTokenKind::Boolean | CSharpTokenKind::Null => {
            palette::BLUE
        }
        CSharpTokenKind::String | CSharpTokenKind::Character => palette::DARK_RED,
        CSharpTokenKind::Number => palette::GREEN,
        CSharpTokenKind::Comment => palette::GREEN,
        CSharpTokenKind::Preprocessor
        | CSharpTokenKind::Attribute
        | CSharpTokenKind::Operator => palette::GRAY,
        CSharpTokenKind::Identifier => palette::WHITE,
        _ => palette::BLACK,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::CSharpLexer;
    use crate::syntax::CSharpParser;

    fn highlight(source: &str) -> Vec<HighlightedToken<CSharpTokenKind>> {
        let tokens = CSharpLexer::new().tokenize(source);
        let mut parser = CSharpParser::new(tokens);
        let forest = parser.parse();
        resolve(&forest, parser.into_tokens())
    }

    fn style_of<'a>(
        stream: &'a [HighlightedToken<CSharpTokenKind>],
        text: &str,
    ) -> &'a HighlightedToken<CSharpTokenKind> {
        stream
            .iter()
            .find(|h| h.token.text == text)
            .unwrap_or_else(|| panic!("no token '{}'", text))
    }

    #[test]
    fn test_class_declaration_coloring() {
        let stream = highlight("public class Widget : IRender {\n}\n");

        let modifier = style_of(&stream, "public");
        assert_eq!(modifier.color, palette::BLUE);
        assert!(modifier.bold);

        let keyword = style_of(&stream, "class");
        assert_eq!(keyword.color, palette::BLUE);
        assert!(keyword.bold);

        let name = style_of(&stream, "Widget");
        assert_eq!(name.color, palette::DARK_CYAN);
        assert!(name.bold);

        let base = style_of(&stream, "IRender");
        assert_eq!(base.color, palette::DARK_CYAN);
        assert!(!base.bold);
    }

    #[test]
    fn test_method_and_parameter_coloring() {
        let stream = highlight(
            "class C {\npublic int Add(int left, int right) {\nreturn left;\n}\n}\n",
        );

        let name = style_of(&stream, "Add");
        assert_eq!(name.color, palette::YELLOW);

        let param = style_of(&stream, "right");
        assert_eq!(param.color, palette::DARK_GRAY);

        let ret = style_of(&stream, "return");
        assert_eq!(ret.color, palette::PURPLE);
        assert!(ret.bold);
    }

    #[test]
    fn test_declaration_vs_call_statement() {
        let stream = highlight("class C {\nvoid M() {\nFoo bar;\nbar();\n}\n}\n");

        // `Foo bar;` is a declaration: type then name
        let type_token = style_of(&stream, "Foo");
        assert_eq!(type_token.color, palette::BLUE);

        let occurrences: Vec<_> = stream.iter().filter(|h| h.token.text == "bar").collect();
        assert_eq!(occurrences.len(), 2);
        // Declared name, then the same identifier as a call
        assert_eq!(occurrences[0].color, palette::WHITE);
        assert_eq!(occurrences[1].color, palette::YELLOW);
    }

    #[test]
    fn test_coloring_recurses_through_block_statement() {
        let stream = highlight("class C {\nvoid M() {\n{ int n = 1; }\n}\n}\n");

        let type_token = style_of(&stream, "int");
        assert_eq!(type_token.color, palette::BLUE);

        let name = style_of(&stream, "n");
        assert_eq!(name.color, palette::WHITE);
    }

    #[test]
    fn test_using_and_namespace_coloring() {
        let stream = highlight("using System.Text;\nnamespace App.Core {\n}\n");

        let using = style_of(&stream, "using");
        assert_eq!(using.color, palette::PURPLE);
        assert!(using.bold);

        // The assembled dotted name is positioned at its first segment;
        // later segments keep the identifier fallback
        let head = style_of(&stream, "System");
        assert_eq!(head.color, palette::BLACK);
        let tail = style_of(&stream, "Text");
        assert_eq!(tail.color, palette::WHITE);

        let ns_head = style_of(&stream, "App");
        assert_eq!(ns_head.color, palette::BLACK);
        assert!(!ns_head.bold);
    }

    #[test]
    fn test_enum_member_coloring() {
        let stream = highlight("enum Mode {\nFast,\nSlow\n}\n");

        let name = style_of(&stream, "Mode");
        assert_eq!(name.color, palette::DARK_CYAN);
        assert!(name.bold);

        let member = style_of(&stream, "Fast");
        assert_eq!(member.color, palette::DARK_GRAY);
        assert!(!member.bold);
    }

    #[test]
    fn test_attribute_and_preprocessor_fallback() {
        let stream = highlight("#region top\n[Serializable]\nclass C {\n}\n");

        let preprocessor = style_of(&stream, "#region top");
        assert_eq!(preprocessor.color, palette::GRAY);

        // The bracketed run is one token; its extracted name node shares the
        // same offset so the whole run takes the attribute color
        let attribute = style_of(&stream, "[Serializable]");
        assert_eq!(attribute.color, palette::GRAY);
    }

    #[test]
    fn test_literal_and_comment_fallback() {
        let stream = highlight("class C {\nint n = 42; // answer\nstring s = \"x\";\n}\n");

        assert_eq!(style_of(&stream, "42").color, palette::GREEN);
        assert_eq!(style_of(&stream, "// answer").color, palette::GREEN);
        assert_eq!(style_of(&stream, "\"x\"").color, palette::DARK_RED);
    }
}
