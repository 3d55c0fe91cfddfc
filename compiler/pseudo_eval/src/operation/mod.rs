//! The executable operation tree.
//!
//! The builder lowers every AST node into one [`Operation`]. Evaluation is
//! a direct walk: [`Operation::handle`] takes the current context and
//! returns the produced value. Statements produce nil; control flow is
//! signalled through the loop and function state of the context rather than
//! through the return value.

mod control;
mod evaluate;
mod function;
mod resolve;

pub use control::{Block, Clause, For, Statement, While};
pub use evaluate::Evaluate;
pub use function::{FunctionDef, Param};
pub use resolve::{Assign, Call, Resolve, Segment};

use std::rc::Rc;

use pseudo_ir::UnaryOperator;
use pseudo_stack::ensure_sufficient_stack;

use crate::context::{Context, ContextKind, ContextState};
use crate::errors::{not_instantiable, unexpected_break, unexpected_continue, unexpected_return};
use crate::value::{Function, Path, ScriptMap};
use crate::{EvalResult, Value};

#[derive(Debug)]
pub enum Operation {
    /// Placeholder for code that failed to parse.
    Noop,
    Literal(Value),
    /// A fixed value that is not a source literal (`else` conditions).
    Reference(Value),
    Resolve(Resolve),
    Assign(Box<Assign>),
    Call(Box<Call>),
    Function(Rc<FunctionDef>),
    Chunk(Block),
    If(Vec<Clause>),
    While(Box<While>),
    For(Box<For>),
    Return(Option<Box<Operation>>),
    Break,
    Continue,
    Debugger,
    Evaluate(Box<Evaluate>),
    Not(Box<Operation>),
    /// Unary `-` or `+`.
    NegatedBinary {
        operator: UnaryOperator,
        argument: Box<Operation>,
    },
    NewInstance(Box<Operation>),
    Map(Vec<(String, Operation)>),
    List(Vec<Operation>),
    /// An imported file, already lowered, run under its own target.
    Import {
        target: Rc<str>,
        chunk: Box<Operation>,
    },
}

impl Operation {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        ensure_sufficient_stack(|| self.handle_inner(ctx))
    }

    fn handle_inner(&self, ctx: &Rc<Context>) -> EvalResult {
        match self {
            Operation::Noop => Ok(Value::Nil),
            Operation::Literal(value) | Operation::Reference(value) => Ok(value.clone()),
            Operation::Resolve(resolve) => resolve.handle(ctx),
            Operation::Assign(assign) => assign.handle(ctx),
            Operation::Call(call) => call.handle(ctx),
            Operation::Function(def) => {
                let function = Value::from(Function::script(Rc::clone(def), Rc::clone(ctx)));
                if def.is_named() {
                    ctx.set(&Path::single(def.name().to_string()), function.clone())?;
                }
                Ok(function)
            }
            Operation::Chunk(block) => {
                block.run(ctx)?;
                Ok(Value::Nil)
            }
            Operation::If(clauses) => {
                for clause in clauses {
                    if clause.condition.handle(ctx)?.to_truthy() {
                        clause.body.run(ctx)?;
                        break;
                    }
                }
                Ok(Value::Nil)
            }
            Operation::While(op) => op.handle(ctx),
            Operation::For(op) => op.handle(ctx),
            Operation::Return(argument) => {
                let state = ctx.function_state().ok_or_else(unexpected_return)?;
                let value = match argument {
                    Some(argument) => argument.handle(ctx)?,
                    None => Value::Nil,
                };
                state.finish(value);
                Ok(Value::Nil)
            }
            Operation::Break => {
                ctx.loop_state().ok_or_else(unexpected_break)?.set_break(true);
                Ok(Value::Nil)
            }
            Operation::Continue => {
                ctx.loop_state()
                    .ok_or_else(unexpected_continue)?
                    .set_continue(true);
                Ok(Value::Nil)
            }
            Operation::Debugger => {
                ctx.debugger().set_breakpoint(true);
                Ok(Value::Nil)
            }
            Operation::Evaluate(op) => op.handle(ctx),
            Operation::Not(argument) => Ok(Value::from(!argument.handle(ctx)?.to_truthy())),
            Operation::NegatedBinary { operator, argument } => {
                let n = argument.handle(ctx)?.to_number();
                Ok(Value::from(match operator {
                    UnaryOperator::Neg => -n,
                    _ => n,
                }))
            }
            Operation::NewInstance(argument) => match argument.handle(ctx)? {
                Value::Map(map) => Ok(Value::map(map.borrow().instantiate())),
                _ => Err(not_instantiable()),
            },
            Operation::Map(fields) => {
                let mut map = ScriptMap::new();
                for (key, value) in fields {
                    map.insert(key.as_str(), value.handle(ctx)?);
                }
                Ok(Value::map(map))
            }
            Operation::List(items) => {
                let items = items
                    .iter()
                    .map(|item| item.handle(ctx))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(items))
            }
            Operation::Import { target, chunk } => {
                let import_ctx = ctx.fork_with(
                    ContextKind::External,
                    ContextState::Temporary,
                    Some(Rc::clone(target)),
                    None,
                );
                chunk.handle(&import_ctx)
            }
        }
    }
}
