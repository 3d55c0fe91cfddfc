//! Cooperative single-step debugging.
//!
//! When the breakpoint is armed, every statement of a non-injected context
//! first calls the [`Interact`] hook and then blocks until the host either
//! steps (`next_step`), disarms the breakpoint (`resume`) or exits the run.
//! The signals live behind an `Arc` so a [`ProcessHandle`] on another
//! thread can drive them.
//!
//! [`ProcessHandle`]: crate::ProcessHandle

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use pseudo_ir::Position;
use tracing::debug;

use crate::context::Context;

/// Host hook called when execution pauses before a statement.
pub trait Interact {
    fn interact(&self, debugger: &Debugger, ctx: &Rc<Context>, position: Position);
}

/// Hook used when the host installs none: it reports that and lets the
/// run continue.
pub struct NoInteract;

impl Interact for NoInteract {
    fn interact(&self, debugger: &Debugger, _ctx: &Rc<Context>, position: Position) {
        debug!(%position, "Interact is not setup.");
        debugger.set_breakpoint(false);
    }
}

#[derive(Default)]
struct StepState {
    breakpoint: bool,
    next_step: bool,
}

/// Breakpoint state shared with process handles.
#[derive(Default)]
pub(crate) struct StepSignals {
    state: Mutex<StepState>,
    wake: Condvar,
}

impl StepSignals {
    pub(crate) fn set_breakpoint(&self, breakpoint: bool) {
        let mut state = self.state.lock();
        state.breakpoint = breakpoint;
        self.wake.notify_all();
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.state.lock().breakpoint
    }

    pub(crate) fn next_step(&self) {
        let mut state = self.state.lock();
        state.next_step = true;
        self.wake.notify_all();
    }

    /// Wake a paused run so it can observe a changed exit flag.
    pub(crate) fn notify(&self) {
        let _state = self.state.lock();
        self.wake.notify_all();
    }

    /// Block until stepped, resumed or exited.
    fn wait(&self, exit: &AtomicBool) {
        let mut state = self.state.lock();
        loop {
            if !state.breakpoint || exit.load(Ordering::Acquire) {
                return;
            }
            if state.next_step {
                state.next_step = false;
                return;
            }
            self.wake.wait(&mut state);
        }
    }
}

/// Breakpoint control plus the host's interaction hook.
#[derive(Clone)]
pub struct Debugger {
    signals: Arc<StepSignals>,
    interact: Rc<RefCell<Rc<dyn Interact>>>,
}

impl Debugger {
    pub fn new() -> Self {
        Debugger::with_interact(Rc::new(NoInteract))
    }

    pub fn with_interact(interact: Rc<dyn Interact>) -> Self {
        Debugger {
            signals: Arc::default(),
            interact: Rc::new(RefCell::new(interact)),
        }
    }

    pub(crate) fn signals(&self) -> &Arc<StepSignals> {
        &self.signals
    }

    pub fn set_breakpoint(&self, breakpoint: bool) {
        self.signals.set_breakpoint(breakpoint);
    }

    pub fn is_armed(&self) -> bool {
        self.signals.is_armed()
    }

    /// Let a paused run execute one more statement.
    pub fn next_step(&self) {
        self.signals.next_step();
    }

    pub fn set_interact(&self, interact: Rc<dyn Interact>) {
        *self.interact.borrow_mut() = interact;
    }

    /// Pause before the statement at `position`.
    pub(crate) fn pause(&self, ctx: &Rc<Context>, position: Position, exit: &AtomicBool) {
        let hook = Rc::clone(&self.interact.borrow());
        hook.interact(self, ctx, position);
        self.signals.wait(exit);
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Debugger::new()
    }
}

#[cfg(test)]
mod tests;
