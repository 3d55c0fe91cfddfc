//! Parser tests.
//!
//! - `expressions`: precedence, unary operators, suffixes, constructors
//! - `statements`: control flow, functions, assignments, shortcut bodies
//! - `recovery`: strict-mode errors and force-mode recovery
//!
//! Trees are compared through a compact s-expression rendering so each test
//! states the expected shape in one line.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use pseudo_ir::{ClauseKind, LiteralValue, Node, NodeKind};

use crate::{parse, ParseOutput, ParserOptions};

pub(super) fn parse_source(source: &str) -> ParseOutput {
    match parse(source, ParserOptions::default()) {
        Ok(output) => output,
        Err(err) => panic!("unexpected syntax error: {err}"),
    }
}

pub(super) fn parse_forced(source: &str) -> ParseOutput {
    let options = ParserOptions {
        force: true,
        ..ParserOptions::default()
    };
    match parse(source, options) {
        Ok(output) => output,
        Err(err) => panic!("force mode returned an error: {err}"),
    }
}

pub(super) fn body(output: &ParseOutput) -> &[Node] {
    match &output.chunk.kind {
        NodeKind::Chunk { body, .. } => body,
        other => panic!("expected a chunk, got {}", other.name()),
    }
}

/// Render every top-level statement of `source`, one per line.
pub(super) fn render(source: &str) -> String {
    let output = parse_source(source);
    body(&output)
        .iter()
        .map(sexp)
        .collect::<Vec<_>>()
        .join("\n")
}

fn list(nodes: &[Node]) -> String {
    nodes.iter().map(sexp).collect::<Vec<_>>().join(" ")
}

/// `(head part part ...)`, skipping empty parts.
fn form(head: &str, parts: &[String]) -> String {
    let mut out = format!("({head}");
    for part in parts.iter().filter(|part| !part.is_empty()) {
        out.push(' ');
        out.push_str(part);
    }
    out.push(')');
    out
}

pub(super) fn sexp(node: &Node) -> String {
    match &node.kind {
        NodeKind::Chunk { body, .. } => form("chunk", &[list(body)]),
        NodeKind::AssignmentStatement { variable, init } => {
            form("=", &[sexp(variable), sexp(init)])
        }
        NodeKind::CallStatement { expression } => form("stmt", &[sexp(expression)]),
        NodeKind::FunctionDeclaration {
            name,
            parameters,
            body,
        } => {
            let params = parameters
                .iter()
                .map(|param| match &param.default {
                    Some(default) => format!("{}={}", param.name, sexp(default)),
                    None => param.name.clone(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            let name = name.clone().unwrap_or_else(|| "_".to_string());
            form("function", &[name, format!("[{params}]"), list(body)])
        }
        NodeKind::ReturnStatement { argument } => {
            form("return", &[argument.as_deref().map(sexp).unwrap_or_default()])
        }
        NodeKind::IfStatement { clauses } => {
            let clauses = clauses
                .iter()
                .map(|clause| {
                    let head = match clause.kind {
                        ClauseKind::If => "if",
                        ClauseKind::ElseIf => "elif",
                        ClauseKind::Else => "else",
                    };
                    let condition = clause.condition.as_ref().map(sexp).unwrap_or_default();
                    form(head, &[condition, list(&clause.body)])
                })
                .collect::<Vec<_>>();
            form("if-stmt", &clauses)
        }
        NodeKind::WhileStatement { condition, body } => {
            form("while", &[sexp(condition), list(body)])
        }
        NodeKind::ForGenericStatement {
            variable,
            iterator,
            body,
        } => form("for", &[sexp(variable), sexp(iterator), list(body)]),
        NodeKind::BreakStatement => "break".to_string(),
        NodeKind::ContinueStatement => "continue".to_string(),
        NodeKind::DebuggerStatement => "debugger".to_string(),
        NodeKind::ImportExpression { directory } => form("import", &[format!("{directory:?}")]),
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::Literal { value, .. } => match value {
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Number(n) => n.to_string(),
            LiteralValue::String(s) => format!("{s:?}"),
            LiteralValue::Nil => "null".to_string(),
        },
        NodeKind::MemberExpression { origin, identifier } => {
            form(".", &[sexp(origin), sexp(identifier)])
        }
        NodeKind::IndexExpression { origin, index } => form("[]", &[sexp(origin), sexp(index)]),
        NodeKind::CallExpression { origin, arguments } => {
            form("call", &[sexp(origin), list(arguments)])
        }
        NodeKind::NegationExpression { argument } => form("not", &[sexp(argument)]),
        NodeKind::BinaryNegatedExpression { operator, argument }
        | NodeKind::UnaryExpression { operator, argument } => {
            form(operator.as_symbol(), &[sexp(argument)])
        }
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        }
        | NodeKind::LogicalExpression {
            operator,
            left,
            right,
        } => form(operator.as_symbol(), &[sexp(left), sexp(right)]),
        NodeKind::MapConstructorExpression { fields } => {
            let fields = fields
                .iter()
                .map(|field| format!("{:?}:{}", field.key, sexp(&field.value)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{fields}}}")
        }
        NodeKind::ListConstructorExpression { fields } => format!("[{}]", list(fields)),
        NodeKind::EmptyExpression => "<empty>".to_string(),
        NodeKind::InvalidCodeExpression => "<invalid>".to_string(),
    }
}
