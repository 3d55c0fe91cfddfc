//! Path resolution, assignment and calls.

use std::rc::Rc;

use crate::context::Context;
use crate::errors::not_callable;
use crate::value::Path;
use crate::{EvalResult, Value};

use super::Operation;

/// One link of an access chain.
#[derive(Debug)]
pub enum Segment {
    /// `.name` or a bare identifier.
    Identifier(String),
    /// `[expr]`; the value's display string becomes the key.
    Index(Operation),
    /// Any other expression at the root of the chain (`f().x`, `"s".length`).
    Operation(Operation),
}

/// An access chain such as `a.b[0].c`.
#[derive(Debug)]
pub struct Resolve {
    segments: Vec<Segment>,
}

impl Resolve {
    pub fn new(segments: Vec<Segment>) -> Self {
        Resolve { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk every segment but the last.
    ///
    /// Returns the unresolved tail path and the value it is relative to;
    /// `None` means the tail is a variable path in `ctx`.
    pub fn get_result(&self, ctx: &Rc<Context>) -> EvalResult<(Path, Option<Value>)> {
        let mut traversed = Path::new();
        let mut handle: Option<Value> = None;
        let count = self.segments.len();

        for (index, segment) in self.segments.iter().enumerate() {
            let key = match segment {
                Segment::Operation(op) => {
                    handle = Some(op.handle(ctx)?);
                    continue;
                }
                Segment::Identifier(name) => name.clone(),
                Segment::Index(op) => op.handle(ctx)?.to_string(),
            };
            traversed.push(key);
            if index + 1 == count {
                break;
            }
            let next = match &handle {
                Some(value) => value.get(&traversed, ctx.intrinsics())?,
                None => ctx.get(&traversed)?,
            };
            handle = Some(next);
            traversed = Path::new();
        }

        Ok((traversed, handle))
    }

    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let (path, handle) = self.get_result(ctx)?;
        read(ctx, &path, handle.as_ref())
    }
}

fn read(ctx: &Context, path: &Path, handle: Option<&Value>) -> EvalResult {
    match handle {
        Some(value) if path.is_empty() => Ok(value.clone()),
        Some(value) => value.get(path, ctx.intrinsics()),
        None => ctx.get(path),
    }
}

/// `target = value`.
#[derive(Debug)]
pub struct Assign {
    pub target: Resolve,
    pub value: Operation,
}

impl Assign {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let (path, handle) = self.target.get_result(ctx)?;
        let value = self.value.handle(ctx)?;
        match handle {
            Some(handle) => handle.set(&path, value)?,
            None => ctx.set(&path, value)?,
        }
        Ok(Value::Nil)
    }
}

/// `callee(arguments)`. A callee reached through a value receives that
/// value as `self`.
#[derive(Debug)]
pub struct Call {
    pub callee: Resolve,
    pub arguments: Vec<Operation>,
}

impl Call {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let (path, handle) = self.callee.get_result(ctx)?;
        let callee = read(ctx, &path, handle.as_ref())?;
        let args = self
            .arguments
            .iter()
            .map(|arg| arg.handle(ctx))
            .collect::<EvalResult<Vec<_>>>()?;

        match callee {
            Value::Function(function) => function.run(ctx, handle.unwrap_or_default(), args),
            _ => Err(not_callable()),
        }
    }
}
