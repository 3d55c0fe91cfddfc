//! The embedding facade.
//!
//! An [`Interpreter`] owns the API and global contexts of one target, the
//! handler set and the debugger. Each call to [`Interpreter::run`] lowers
//! the source, binds the API table and `params`, and executes the tree on
//! the calling thread. A [`ProcessHandle`] lets other threads pause, step or
//! stop that run.
//!
//! Configuration setters fail while a run is pending.

mod builder;
mod handle;

pub use builder::InterpreterBuilder;
pub use handle::ProcessHandle;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use pseudo_parse::ParserOptions;
use tracing::{debug, warn};

use crate::context::{Context, ContextKind, ContextState, Runtime};
use crate::cps::Cps;
use crate::debugger::{Debugger, Interact};
use crate::errors::{
    api_locked, cannot_inject, debugger_locked, handler_locked, process_already_running,
    target_locked, target_not_found,
};
use crate::handler::{HandlerContainer, OutputHandler};
use crate::intrinsics::builtin_api;
use crate::operation::Operation;
use crate::value::{Path, ScriptMap};
use crate::{EvalResult, ScriptError, Value};

struct Config {
    target: String,
    api: ScriptMap,
    argv: Vec<String>,
    options: ParserOptions,
}

/// The two long-lived frames of a target.
struct Contexts {
    api: Rc<Context>,
    global: Rc<Context>,
}

impl Contexts {
    fn new(target: &str, runtime: &Rc<Runtime>) -> Self {
        let api = Context::root(target, Rc::clone(runtime));
        let global = api.fork(ContextKind::Global, ContextState::Default);
        Contexts { api, global }
    }
}

pub struct Interpreter {
    config: RefCell<Config>,
    runtime: Rc<Runtime>,
    contexts: RefCell<Contexts>,
    builtins: ScriptMap,
    /// Syntax errors skipped over in force mode.
    recovered: RefCell<Vec<ScriptError>>,
}

impl Interpreter {
    /// An interpreter with every default; see [`InterpreterBuilder`].
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub(crate) fn from_parts(
        target: &str,
        api: ScriptMap,
        argv: Vec<String>,
        handlers: HandlerContainer,
        debugger: Debugger,
        options: ParserOptions,
    ) -> Self {
        let runtime = Rc::new(Runtime::new(handlers, debugger));
        let contexts = Contexts::new(target, &runtime);
        Interpreter {
            config: RefCell::new(Config {
                target: target.to_string(),
                api,
                argv,
                options,
            }),
            runtime,
            contexts: RefCell::new(contexts),
            builtins: builtin_api(),
            recovered: RefCell::new(Vec::new()),
        }
    }

    /// A `Send + Sync` remote for runs of this interpreter.
    pub fn handle(&self) -> ProcessHandle {
        ProcessHandle::new(
            Arc::clone(self.runtime.process.signals()),
            Arc::clone(self.runtime.debugger.signals()),
        )
    }

    pub fn target(&self) -> String {
        self.config.borrow().target.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.runtime.process.signals().is_pending()
    }

    pub fn output(&self) -> Rc<OutputHandler> {
        Rc::clone(&self.runtime.handlers.borrow().output)
    }

    pub fn debugger(&self) -> &Debugger {
        &self.runtime.debugger
    }

    /// The API frame, root of every context of this target.
    pub fn api_context(&self) -> Rc<Context> {
        Rc::clone(&self.contexts.borrow().api)
    }

    pub fn global_context(&self) -> Rc<Context> {
        Rc::clone(&self.contexts.borrow().global)
    }

    /// Lower `code` into an operation tree.
    ///
    /// Errors go to the error handler; if it swallows them the result is a
    /// no-op tree.
    pub fn prepare(&self, code: &str) -> Result<Operation, ScriptError> {
        match self.compile(code) {
            Ok(top) => Ok(top),
            Err(err) => {
                self.raise(err)?;
                Ok(Operation::Noop)
            }
        }
    }

    fn compile(&self, code: &str) -> Result<Operation, ScriptError> {
        let (target, options) = {
            let config = self.config.borrow();
            (config.target.clone(), config.options)
        };
        let resource = Rc::clone(&self.runtime.handlers.borrow().resource);

        let output = pseudo_parse::parse(code, options)?;
        let mut cps = Cps::new(&target, &*resource, options);
        let top = cps.visit(&output.chunk)?;

        let mut recovered: Vec<ScriptError> =
            output.errors.into_iter().map(ScriptError::from).collect();
        recovered.extend(cps.take_errors());
        for err in &recovered {
            warn!(%err, "recovered from syntax error");
        }
        self.recovered.borrow_mut().extend(recovered);
        Ok(top)
    }

    /// Lower and run `code` against the global context.
    pub fn run(&self, code: &str) -> Result<(), ScriptError> {
        let top = self.prepare(code)?;
        self.run_operation(&top)
    }

    /// Read the current target through the resource handler and run it.
    pub fn run_target(&self) -> Result<(), ScriptError> {
        let target = self.target();
        let resource = Rc::clone(&self.runtime.handlers.borrow().resource);
        match resource.get(&target) {
            Some(code) => self.run(&code),
            None => self.raise(target_not_found(target).into()),
        }
    }

    /// Execute an already lowered tree.
    pub fn run_operation(&self, top: &Operation) -> Result<(), ScriptError> {
        let signals = Arc::clone(self.runtime.process.signals());
        if signals.is_pending() {
            return Err(process_already_running().into());
        }

        let (api_ctx, global) = {
            let contexts = self.contexts.borrow();
            (Rc::clone(&contexts.api), Rc::clone(&contexts.global))
        };
        let params = {
            let config = self.config.borrow();
            api_ctx.extend(
                self.builtins
                    .iter()
                    .chain(config.api.iter())
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
            Value::list(config.argv.iter().map(|arg| Value::from(arg.as_str())).collect())
        };
        global.scope().borrow_mut().insert("params", params);

        signals.set_exit(false);
        signals.set_pending(true);
        debug!(script = %global.target(), "run started");

        let result = top.handle(&global);

        signals.set_pending(false);
        global.clear_last_active();
        debug!(script = %global.target(), exited = signals.is_exit(), "run finished");

        match result {
            Ok(_) => Ok(()),
            Err(err) => self.raise(err.into()),
        }
    }

    /// Run `code` in an injected fork of the global context.
    pub fn inject(&self, code: &str) -> Result<(), ScriptError> {
        let global = self.global_context();
        self.inject_into(code, &global)
    }

    /// Run `code` where the pending run last stepped.
    pub fn inject_in_last_context(&self, code: &str) -> Result<(), ScriptError> {
        let last = self.api_context().last_active();
        match last {
            Some(last) if self.is_pending() => self.inject_into(code, &last),
            _ => Err(cannot_inject().into()),
        }
    }

    fn inject_into(&self, code: &str, ctx: &Rc<Context>) -> Result<(), ScriptError> {
        let top = self.prepare(code)?;
        let injection = ctx.fork_with(ContextKind::Call, ContextState::Temporary, None, Some(true));
        debug!(kind = ?ctx.kind(), "injecting code");
        match top.handle(&injection) {
            Ok(_) => Ok(()),
            Err(err) => self.raise(err.into()),
        }
    }

    /// Switch to another target. Globals of the previous target are dropped.
    pub fn set_target(&self, target: &str) -> EvalResult<()> {
        if self.is_pending() {
            return Err(target_locked());
        }
        self.config.borrow_mut().target = target.to_string();
        *self.contexts.borrow_mut() = Contexts::new(target, &self.runtime);
        Ok(())
    }

    /// Replace the host API table merged over the built-ins.
    pub fn set_api(&self, api: ScriptMap) -> EvalResult<()> {
        if self.is_pending() {
            return Err(api_locked());
        }
        self.config.borrow_mut().api = api;
        Ok(())
    }

    pub fn set_argv(&self, argv: Vec<String>) {
        self.config.borrow_mut().argv = argv;
    }

    pub fn set_handlers(&self, handlers: HandlerContainer) -> EvalResult<()> {
        if self.is_pending() {
            return Err(handler_locked());
        }
        *self.runtime.handlers.borrow_mut() = handlers;
        Ok(())
    }

    pub fn set_debugger(&self, interact: Rc<dyn Interact>) -> EvalResult<()> {
        if self.is_pending() {
            return Err(debugger_locked());
        }
        self.runtime.debugger.set_interact(interact);
        Ok(())
    }

    /// Read a dotted path from the global scope.
    pub fn get_global_variable(&self, path: &str) -> EvalResult {
        self.global_context().get(&Path::parse(path))
    }

    pub fn set_global_variable(&self, path: &str, value: Value) -> EvalResult<()> {
        self.global_context().set(&Path::parse(path), value)
    }

    /// Syntax errors skipped in force mode since the last call.
    pub fn take_recovered_errors(&self) -> Vec<ScriptError> {
        std::mem::take(&mut *self.recovered.borrow_mut())
    }

    pub fn pause(&self) {
        self.handle().pause();
    }

    pub fn resume(&self) {
        self.handle().resume();
    }

    pub fn next_step(&self) {
        self.runtime.debugger.next_step();
    }

    /// Stop the pending run after its current statement.
    pub fn exit(&self) -> EvalResult<()> {
        self.handle().exit()
    }

    fn raise(&self, err: ScriptError) -> Result<(), ScriptError> {
        warn!(%err, "script error");
        let handler = Rc::clone(&self.runtime.handlers.borrow().error);
        handler.raise(err)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
