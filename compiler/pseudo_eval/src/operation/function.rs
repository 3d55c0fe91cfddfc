//! Script function bodies.

use std::rc::Rc;

use pseudo_stack::ensure_sufficient_stack;

use crate::context::{Context, ContextKind, ContextState};
use crate::{EvalResult, Value};

use super::{Block, Operation};

#[derive(Debug)]
pub struct Param {
    pub name: Rc<str>,
    pub default: Option<Operation>,
}

/// A lowered function declaration, shared by every closure created from
/// it.
#[derive(Debug)]
pub struct FunctionDef {
    name: Rc<str>,
    named: bool,
    params: Vec<Param>,
    body: Block,
}

impl FunctionDef {
    pub fn new(name: Option<&str>, params: Vec<Param>, body: Block) -> Self {
        FunctionDef {
            name: Rc::from(name.unwrap_or("anonymous")),
            named: name.is_some(),
            params,
            body,
        }
    }

    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    /// Declarations with a name bind themselves where they are evaluated.
    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn param_names(&self) -> impl Iterator<Item = &Rc<str>> {
        self.params.iter().map(|param| &param.name)
    }

    /// Call with `scope` as the captured context.
    ///
    /// Arguments bind left to right; a missing argument takes its default,
    /// evaluated in the new frame so it can see earlier parameters.
    pub fn invoke(&self, scope: &Rc<Context>, this: Value, args: Vec<Value>) -> EvalResult {
        ensure_sufficient_stack(|| {
            let fn_ctx = scope.fork(ContextKind::Function, ContextState::Default);
            fn_ctx.scope().borrow_mut().insert("self", this);

            let mut args = args.into_iter();
            for param in &self.params {
                let value = match (args.next(), &param.default) {
                    (Some(value), _) => value,
                    (None, Some(default)) => default.handle(&fn_ctx)?,
                    (None, None) => Value::Nil,
                };
                fn_ctx
                    .scope()
                    .borrow_mut()
                    .insert(param.name.to_string(), value);
            }

            self.body.run(&fn_ctx)?;
            Ok(fn_ctx
                .function_state()
                .map(|state| state.value())
                .unwrap_or_default())
        })
    }
}
