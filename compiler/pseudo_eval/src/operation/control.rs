//! Statement sequencing and loops.

use std::rc::Rc;

use pseudo_ir::Position;

use crate::context::{Context, ContextKind, LoopState};
use crate::{EvalResult, Value};

use super::{Operation, Resolve};

/// An operation tagged with where its statement starts.
#[derive(Debug)]
pub struct Statement {
    pub op: Operation,
    pub position: Position,
}

/// A statement list run in the caller's context.
#[derive(Debug, Default)]
pub struct Block {
    statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Run statements in order, stepping the debugger before each one.
    ///
    /// Stops early once the process exits, or once the enclosing loop
    /// breaks/continues or the enclosing function returns.
    pub fn run(&self, ctx: &Rc<Context>) -> EvalResult<()> {
        for statement in &self.statements {
            ctx.step(statement.position);
            statement
                .op
                .handle(ctx)
                .map_err(|err| err.or_line(statement.position.line))?;
            if is_interrupted(ctx) {
                break;
            }
        }
        Ok(())
    }
}

fn is_interrupted(ctx: &Context) -> bool {
    if ctx.is_exit() {
        return true;
    }
    let returned = || ctx.function_state().is_some_and(|state| state.is_return());
    match ctx.kind() {
        ContextKind::Loop => {
            ctx.loop_state()
                .is_some_and(|state| state.is_break() || state.is_continue())
                || returned()
        }
        ContextKind::Function => returned(),
        _ => false,
    }
}

/// One `if`/`else if`/`else` branch. `else` has a constant true condition.
#[derive(Debug)]
pub struct Clause {
    pub condition: Operation,
    pub body: Block,
}

#[derive(Debug)]
pub struct While {
    pub condition: Operation,
    pub body: Block,
}

impl While {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let (loop_ctx, state) = ctx.fork_loop();
        while self.condition.handle(&loop_ctx)?.to_truthy() {
            state.set_continue(false);
            self.body.run(&loop_ctx)?;
            if should_leave(&loop_ctx, &state) {
                break;
            }
        }
        Ok(Value::Nil)
    }
}

/// `for variable in iterator`.
#[derive(Debug)]
pub struct For {
    pub variable: Resolve,
    pub iterator: Operation,
    pub body: Block,
}

impl For {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let (loop_ctx, state) = ctx.fork_loop();
        let (path, handle) = self.variable.get_result(&loop_ctx)?;
        let iterable = self.iterator.handle(&loop_ctx)?;

        for item in iterable.iter()? {
            state.set_continue(false);
            match &handle {
                Some(handle) => handle.set(&path, item)?,
                None => loop_ctx.set(&path, item)?,
            }
            self.body.run(&loop_ctx)?;
            if should_leave(&loop_ctx, &state) {
                break;
            }
        }
        Ok(Value::Nil)
    }
}

fn should_leave(ctx: &Context, state: &LoopState) -> bool {
    state.is_break()
        || ctx.is_exit()
        || ctx.function_state().is_some_and(|state| state.is_return())
}
