//! Lowering from AST to the operation tree.
//!
//! [`Cps::visit`] maps every node kind to exactly one [`Operation`].
//! Access chains (`a.b[i]`, `f().x`) become [`Resolve`] segment lists, and
//! `import` statements are read, parsed and lowered here, so the returned
//! tree needs no further I/O to run.

use std::rc::Rc;

use pseudo_ir::{LiteralValue, Node, NodeKind, UnaryOperator};
use pseudo_parse::ParserOptions;
use pseudo_stack::ensure_sufficient_stack;
use tracing::{debug, warn};

use crate::errors::{import_not_found, unexpected_ast_type, unknown_unary};
use crate::handler::ResourceHandler;
use crate::operation::{
    Assign, Block, Call, Clause, Evaluate, For, FunctionDef, Operation, Param, Resolve, Segment,
    Statement, While,
};
use crate::{ScriptError, Value};

pub struct Cps<'a> {
    /// Target the code being lowered came from; imports resolve against it.
    target: Rc<str>,
    resource: &'a dyn ResourceHandler,
    options: ParserOptions,
    /// The root target plus the imports currently being lowered.
    importing: Vec<Rc<str>>,
    /// Syntax errors recovered from while parsing imports in force mode.
    errors: Vec<ScriptError>,
}

impl<'a> Cps<'a> {
    pub fn new(target: &str, resource: &'a dyn ResourceHandler, options: ParserOptions) -> Self {
        let target: Rc<str> = Rc::from(target);
        Cps {
            importing: vec![Rc::clone(&target)],
            target,
            resource,
            options,
            errors: Vec::new(),
        }
    }

    pub fn take_errors(&mut self) -> Vec<ScriptError> {
        std::mem::take(&mut self.errors)
    }

    pub fn visit(&mut self, node: &Node) -> Result<Operation, ScriptError> {
        ensure_sufficient_stack(|| self.visit_inner(node))
            .map_err(|err| with_line(err, node.line()))
    }

    fn visit_inner(&mut self, node: &Node) -> Result<Operation, ScriptError> {
        let op = match &node.kind {
            NodeKind::Chunk { body, .. } => Operation::Chunk(self.block(body)?),
            NodeKind::AssignmentStatement { variable, init } => {
                Operation::Assign(Box::new(Assign {
                    target: self.target_path(variable)?,
                    value: self.visit(init)?,
                }))
            }
            NodeKind::CallStatement { expression } => self.visit(expression)?,
            NodeKind::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                let params = parameters
                    .iter()
                    .map(|param| {
                        Ok(Param {
                            name: Rc::from(param.name.as_str()),
                            default: param
                                .default
                                .as_ref()
                                .map(|default| self.visit(default))
                                .transpose()?,
                        })
                    })
                    .collect::<Result<Vec<_>, ScriptError>>()?;
                let body = self.block(body)?;
                Operation::Function(Rc::new(FunctionDef::new(name.as_deref(), params, body)))
            }
            NodeKind::ReturnStatement { argument } => Operation::Return(
                argument
                    .as_ref()
                    .map(|argument| self.visit(argument).map(Box::new))
                    .transpose()?,
            ),
            NodeKind::IfStatement { clauses } => {
                let clauses = clauses
                    .iter()
                    .map(|clause| {
                        let condition = match &clause.condition {
                            Some(condition) => self.visit(condition)?,
                            None => Operation::Reference(Value::from(true)),
                        };
                        Ok(Clause {
                            condition,
                            body: self.block(&clause.body)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ScriptError>>()?;
                Operation::If(clauses)
            }
            NodeKind::WhileStatement { condition, body } => Operation::While(Box::new(While {
                condition: self.visit(condition)?,
                body: self.block(body)?,
            })),
            NodeKind::ForGenericStatement {
                variable,
                iterator,
                body,
            } => Operation::For(Box::new(For {
                variable: self.target_path(variable)?,
                iterator: self.visit(iterator)?,
                body: self.block(body)?,
            })),
            NodeKind::BreakStatement => Operation::Break,
            NodeKind::ContinueStatement => Operation::Continue,
            NodeKind::DebuggerStatement => Operation::Debugger,
            NodeKind::ImportExpression { directory } => self.import(directory)?,
            NodeKind::Identifier { .. }
            | NodeKind::MemberExpression { .. }
            | NodeKind::IndexExpression { .. } => Operation::Resolve(self.resolve(node)?),
            NodeKind::Literal { value, .. } => Operation::Literal(match value {
                LiteralValue::Boolean(b) => Value::from(*b),
                LiteralValue::Number(n) => Value::from(*n),
                LiteralValue::String(s) => Value::from(s.as_str()),
                LiteralValue::Nil => Value::Nil,
            }),
            NodeKind::CallExpression { origin, arguments } => Operation::Call(Box::new(Call {
                callee: self.resolve(origin)?,
                arguments: arguments
                    .iter()
                    .map(|argument| self.visit(argument))
                    .collect::<Result<_, _>>()?,
            })),
            NodeKind::NegationExpression { argument } => {
                Operation::Not(Box::new(self.visit(argument)?))
            }
            NodeKind::BinaryNegatedExpression { operator, argument } => {
                Operation::NegatedBinary {
                    operator: *operator,
                    argument: Box::new(self.visit(argument)?),
                }
            }
            NodeKind::UnaryExpression { operator, argument } => match operator {
                UnaryOperator::New => Operation::NewInstance(Box::new(self.visit(argument)?)),
                _ => return Err(unknown_unary().into()),
            },
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => Operation::Evaluate(Box::new(Evaluate {
                operator: *operator,
                left: self.visit(left)?,
                right: self.visit(right)?,
            })),
            NodeKind::MapConstructorExpression { fields } => Operation::Map(
                fields
                    .iter()
                    .map(|field| Ok((field.key.clone(), self.visit(&field.value)?)))
                    .collect::<Result<_, ScriptError>>()?,
            ),
            NodeKind::ListConstructorExpression { fields } => Operation::List(
                fields
                    .iter()
                    .map(|field| self.visit(field))
                    .collect::<Result<_, _>>()?,
            ),
            NodeKind::EmptyExpression | NodeKind::InvalidCodeExpression => Operation::Noop,
        };
        Ok(op)
    }

    fn block(&mut self, body: &[Node]) -> Result<Block, ScriptError> {
        let statements = body
            .iter()
            .map(|node| {
                Ok(Statement {
                    op: self.visit(node)?,
                    position: node.start,
                })
            })
            .collect::<Result<_, ScriptError>>()?;
        Ok(Block::new(statements))
    }

    /// Assignment and loop targets must be access chains.
    fn target_path(&mut self, node: &Node) -> Result<Resolve, ScriptError> {
        match node.kind {
            NodeKind::Identifier { .. }
            | NodeKind::MemberExpression { .. }
            | NodeKind::IndexExpression { .. } => self.resolve(node),
            _ => Err(unexpected_ast_type(node.kind.name()).into()),
        }
    }

    fn resolve(&mut self, node: &Node) -> Result<Resolve, ScriptError> {
        let mut segments = Vec::new();
        self.collect_segments(node, &mut segments)?;
        Ok(Resolve::new(segments))
    }

    fn collect_segments(&mut self, node: &Node, segments: &mut Vec<Segment>) -> Result<(), ScriptError> {
        match &node.kind {
            NodeKind::MemberExpression { origin, identifier } => {
                self.collect_segments(origin, segments)?;
                self.collect_segments(identifier, segments)
            }
            NodeKind::IndexExpression { origin, index } => {
                self.collect_segments(origin, segments)?;
                segments.push(Segment::Index(self.visit(index)?));
                Ok(())
            }
            NodeKind::Identifier { name } => {
                segments.push(Segment::Identifier(name.clone()));
                Ok(())
            }
            _ => {
                segments.push(Segment::Operation(self.visit(node)?));
                Ok(())
            }
        }
    }

    /// Read, parse and lower an imported file relative to the current
    /// target. A file that is already being imported lowers to a no-op.
    fn import(&mut self, directory: &str) -> Result<Operation, ScriptError> {
        let target = self
            .resource
            .get_target_relative_to(&self.target, directory)
            .ok_or_else(|| import_not_found(directory))?;
        if self.importing.iter().any(|open| **open == *target) {
            warn!(%target, "skipping cyclic import");
            return Ok(Operation::Noop);
        }
        let source = self
            .resource
            .get(&target)
            .ok_or_else(|| import_not_found(directory))?;

        debug!(%target, from = %self.target, "lowering import");
        let output = pseudo_parse::parse(&source, self.options)?;
        self.errors
            .extend(output.errors.into_iter().map(ScriptError::from));

        let target: Rc<str> = Rc::from(target);
        let previous = std::mem::replace(&mut self.target, Rc::clone(&target));
        self.importing.push(Rc::clone(&target));
        let chunk = self.visit(&output.chunk);
        self.importing.pop();
        self.target = previous;

        Ok(Operation::Import {
            target,
            chunk: Box::new(chunk?),
        })
    }
}

fn with_line(err: ScriptError, line: u32) -> ScriptError {
    match err {
        ScriptError::Interpreter(err) => ScriptError::Interpreter(err.or_line(line)),
        other => other,
    }
}
