//! Execution contexts.
//!
//! Contexts form a chain from the current frame back to the API root. Each
//! one owns a scope map and shares the process-wide [`Runtime`] (signals,
//! handlers, debugger, intrinsic tables). Loop and function frames carry
//! the control flags that `break`, `continue` and `return` set.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pseudo_ir::Position;

use crate::debugger::Debugger;
use crate::errors::{cannot_get_path, cannot_set_path, no_running_process};
use crate::handler::HandlerContainer;
use crate::value::{Path, ScriptMap, Shared};
use crate::{EvalResult, Intrinsics, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Api,
    Global,
    Function,
    External,
    Loop,
    Map,
    Call,
}

/// A temporary context forwards every read and write to its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContextState {
    Temporary,
    Default,
}

/// `break`/`continue` flags of the innermost loop.
#[derive(Debug, Default)]
pub struct LoopState {
    is_break: Cell<bool>,
    is_continue: Cell<bool>,
}

impl LoopState {
    pub fn is_break(&self) -> bool {
        self.is_break.get()
    }

    pub fn set_break(&self, value: bool) {
        self.is_break.set(value);
    }

    pub fn is_continue(&self) -> bool {
        self.is_continue.get()
    }

    pub fn set_continue(&self, value: bool) {
        self.is_continue.set(value);
    }
}

/// Return flag and value of the innermost function call.
#[derive(Debug, Default)]
pub struct FunctionState {
    value: RefCell<Value>,
    is_return: Cell<bool>,
}

impl FunctionState {
    pub fn is_return(&self) -> bool {
        self.is_return.get()
    }

    /// Record a `return` with its value.
    pub fn finish(&self, value: Value) {
        *self.value.borrow_mut() = value;
        self.is_return.set(true);
    }

    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }
}

/// Exit and pending flags shared with process handles.
#[derive(Debug, Default)]
pub(crate) struct ProcessSignals {
    exit: AtomicBool,
    pending: AtomicBool,
}

impl ProcessSignals {
    #[inline]
    pub(crate) fn is_exit(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    pub(crate) fn set_exit(&self, exit: bool) {
        self.exit.store(exit, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub(crate) fn set_pending(&self, pending: bool) {
        self.pending.store(pending, Ordering::Release);
    }

    pub(crate) fn exit_flag(&self) -> &AtomicBool {
        &self.exit
    }
}

/// Process-wide state of one run.
#[derive(Default)]
pub(crate) struct ProcessState {
    signals: Arc<ProcessSignals>,
    last_active: RefCell<Weak<Context>>,
}

impl ProcessState {
    pub(crate) fn signals(&self) -> &Arc<ProcessSignals> {
        &self.signals
    }
}

/// State shared by every context of one interpreter.
pub(crate) struct Runtime {
    pub(crate) process: ProcessState,
    pub(crate) debugger: Debugger,
    pub(crate) handlers: RefCell<HandlerContainer>,
    pub(crate) intrinsics: Intrinsics,
}

impl Runtime {
    pub(crate) fn new(handlers: HandlerContainer, debugger: Debugger) -> Self {
        Runtime {
            process: ProcessState::default(),
            debugger,
            handlers: RefCell::new(handlers),
            intrinsics: Intrinsics::new(),
        }
    }
}

/// One frame of the context chain.
pub struct Context {
    kind: ContextKind,
    state: ContextState,
    target: Rc<str>,
    injected: bool,
    scope: Shared<ScriptMap>,
    previous: Option<Rc<Context>>,
    // Nearest strict ancestors of each kind; the frame itself is derived
    // from `kind`.
    api: Option<Rc<Context>>,
    globals: Option<Rc<Context>>,
    locals: Option<Rc<Context>>,
    loop_state: Option<Rc<LoopState>>,
    function_state: Option<Rc<FunctionState>>,
    runtime: Rc<Runtime>,
    position: Cell<Position>,
}

impl Context {
    /// The API root of a fresh context chain.
    pub(crate) fn root(target: &str, runtime: Rc<Runtime>) -> Rc<Context> {
        Rc::new(Context {
            kind: ContextKind::Api,
            state: ContextState::Default,
            target: Rc::from(target),
            injected: false,
            scope: Shared::default(),
            previous: None,
            api: None,
            globals: None,
            locals: None,
            loop_state: None,
            function_state: None,
            runtime,
            position: Cell::new(Position::default()),
        })
    }

    /// A child context inheriting target and injection from `self`.
    pub fn fork(self: &Rc<Self>, kind: ContextKind, state: ContextState) -> Rc<Context> {
        self.fork_with(kind, state, None, None)
    }

    /// A child context. Function frames start without a loop and with a
    /// fresh return slot; loop frames get fresh loop flags; anything else
    /// shares both with `self`.
    pub fn fork_with(
        self: &Rc<Self>,
        kind: ContextKind,
        state: ContextState,
        target: Option<Rc<str>>,
        injected: Option<bool>,
    ) -> Rc<Context> {
        let (loop_state, function_state) = match kind {
            ContextKind::Function => (None, Some(Rc::new(FunctionState::default()))),
            ContextKind::Loop => (
                Some(Rc::new(LoopState::default())),
                self.function_state.clone(),
            ),
            _ => (self.loop_state.clone(), self.function_state.clone()),
        };
        self.child(kind, state, target, injected, loop_state, function_state)
    }

    /// A temporary loop frame together with its fresh loop flags.
    pub fn fork_loop(self: &Rc<Self>) -> (Rc<Context>, Rc<LoopState>) {
        let flags = Rc::new(LoopState::default());
        let ctx = self.child(
            ContextKind::Loop,
            ContextState::Temporary,
            None,
            None,
            Some(Rc::clone(&flags)),
            self.function_state.clone(),
        );
        (ctx, flags)
    }

    fn child(
        self: &Rc<Self>,
        kind: ContextKind,
        state: ContextState,
        target: Option<Rc<str>>,
        injected: Option<bool>,
        loop_state: Option<Rc<LoopState>>,
        function_state: Option<Rc<FunctionState>>,
    ) -> Rc<Context> {
        Rc::new(Context {
            kind,
            state,
            target: target.unwrap_or_else(|| Rc::clone(&self.target)),
            injected: injected.unwrap_or(self.injected),
            scope: Shared::default(),
            previous: Some(Rc::clone(self)),
            api: self.inherit(&self.api, self.kind == ContextKind::Api),
            globals: self.inherit(&self.globals, self.kind == ContextKind::Global),
            locals: self.inherit(&self.locals, self.is_locals_frame()),
            loop_state,
            function_state,
            runtime: Rc::clone(&self.runtime),
            position: Cell::new(self.position.get()),
        })
    }

    fn inherit(self: &Rc<Self>, ancestor: &Option<Rc<Context>>, is_self: bool) -> Option<Rc<Context>> {
        if is_self {
            Some(Rc::clone(self))
        } else {
            ancestor.clone()
        }
    }

    fn is_locals_frame(&self) -> bool {
        matches!(self.kind, ContextKind::Global | ContextKind::Function)
    }

    #[inline]
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn target(&self) -> &Rc<str> {
        &self.target
    }

    #[inline]
    pub fn is_injected(&self) -> bool {
        self.injected
    }

    pub fn previous(&self) -> Option<&Rc<Context>> {
        self.previous.as_ref()
    }

    pub fn scope(&self) -> &Shared<ScriptMap> {
        &self.scope
    }

    pub fn api(&self) -> Option<&Context> {
        if self.kind == ContextKind::Api {
            Some(self)
        } else {
            self.api.as_deref()
        }
    }

    pub fn globals(&self) -> Option<&Context> {
        if self.kind == ContextKind::Global {
            Some(self)
        } else {
            self.globals.as_deref()
        }
    }

    /// Nearest function or global frame, or `self` when there is none.
    pub fn locals(&self) -> &Context {
        if self.is_locals_frame() {
            self
        } else {
            self.locals.as_deref().unwrap_or(self)
        }
    }

    pub fn loop_state(&self) -> Option<&LoopState> {
        self.loop_state.as_deref()
    }

    pub fn function_state(&self) -> Option<&FunctionState> {
        self.function_state.as_deref()
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.runtime.intrinsics
    }

    pub fn debugger(&self) -> &Debugger {
        &self.runtime.debugger
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn runtime(&self) -> &Rc<Runtime> {
        &self.runtime
    }

    pub fn handlers(&self) -> HandlerContainer {
        self.runtime.handlers.borrow().clone()
    }

    /// Send a line to the output handler.
    pub fn print(&self, message: &str) {
        let output = Rc::clone(&self.runtime.handlers.borrow().output);
        output.print(message);
    }

    /// Read a variable path.
    ///
    /// `locals.*` and `globals.*` address those frames explicitly.
    /// Temporary frames defer to their parent; everything else resolves in
    /// the nearest locals frame and walks outward from there.
    pub fn get(&self, path: &Path) -> EvalResult {
        match path.first() {
            Some("locals") => self.locals().get(&path.rest()),
            Some("globals") => match self.globals() {
                Some(globals) => globals.get(&path.rest()),
                None => Err(cannot_get_path(path)),
            },
            _ if self.state == ContextState::Temporary => match &self.previous {
                Some(previous) => previous.get(path),
                None => Ok(Value::Nil),
            },
            _ => self.locals().lookup(path),
        }
    }

    /// Scope lookup: own bindings, then the API, then map intrinsics
    /// for bare names, then the parent chain.
    fn lookup(&self, path: &Path) -> EvalResult {
        if path.is_empty() {
            return Ok(Value::Map(self.scope.clone()));
        }
        let intrinsics = self.intrinsics();
        let own = Value::Map(self.scope.clone());
        if own.has(path) {
            return own.get(path, intrinsics);
        }
        if let Some(api) = self.api() {
            let api_scope = Value::Map(api.scope.clone());
            if api_scope.has(path) {
                return api_scope.get(path, intrinsics);
            }
        }
        if let (1, Some(name)) = (path.len(), path.first()) {
            if let Some(intrinsic) = intrinsics.map_function(name) {
                return Ok(intrinsic);
            }
        }
        match &self.previous {
            Some(previous) => previous.get(path),
            None => Err(cannot_get_path(path)),
        }
    }

    /// Write a variable path; plain names bind in the nearest locals frame.
    pub fn set(&self, path: &Path, value: Value) -> EvalResult<()> {
        match path.first() {
            Some("locals") => self.locals().set(&path.rest(), value),
            Some("globals") => match self.globals() {
                Some(globals) => globals.set(&path.rest(), value),
                None => Err(cannot_set_path(path)),
            },
            _ if self.state == ContextState::Temporary => match &self.previous {
                Some(previous) => previous.set(path, value),
                None => Ok(()),
            },
            _ => Value::Map(self.locals().scope.clone()).set(path, value),
        }
    }

    /// Bind every entry into this frame's scope.
    pub fn extend(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        if self.state == ContextState::Temporary {
            if let Some(previous) = &self.previous {
                previous.extend(entries);
                return;
            }
        }
        self.scope.borrow_mut().extend(entries);
    }

    pub fn position(&self) -> Position {
        self.position.get()
    }

    /// Called before each statement: records the position, marks this as
    /// the last active context and pauses while the breakpoint is armed.
    pub fn step(self: &Rc<Self>, position: Position) {
        if self.injected {
            return;
        }
        self.position.set(position);
        *self.runtime.process.last_active.borrow_mut() = Rc::downgrade(self);

        let debugger = &self.runtime.debugger;
        if debugger.is_armed() {
            debugger.pause(self, position, self.runtime.process.signals.exit_flag());
        }
    }

    /// Innermost non-injected context that executed a statement in the
    /// current run.
    pub fn last_active(&self) -> Option<Rc<Context>> {
        self.runtime.process.last_active.borrow().upgrade()
    }

    pub fn is_exit(&self) -> bool {
        self.runtime.process.signals.is_exit()
    }

    pub fn is_pending(&self) -> bool {
        self.runtime.process.signals.is_pending()
    }

    /// Ask the running process to stop after the current statement.
    pub fn exit(&self) -> EvalResult<()> {
        let signals = &self.runtime.process.signals;
        if !signals.is_pending() {
            return Err(no_running_process());
        }
        signals.set_exit(true);
        self.runtime.debugger.signals().notify();
        Ok(())
    }

    /// Drop the last-active record; called when a run ends.
    pub(crate) fn clear_last_active(&self) {
        *self.runtime.process.last_active.borrow_mut() = Weak::new();
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("injected", &self.injected)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
