//! Cross-thread control of a running interpreter.

use std::sync::Arc;

use tracing::debug;

use crate::context::ProcessSignals;
use crate::debugger::StepSignals;
use crate::errors::{no_running_process, EvalResult};

/// A `Send + Sync` remote for the interpreter it came from.
///
/// Runs execute on the thread that owns the interpreter. Another thread
/// holding this handle can pause, step, resume or stop them.
#[derive(Clone)]
pub struct ProcessHandle {
    process: Arc<ProcessSignals>,
    steps: Arc<StepSignals>,
}

impl ProcessHandle {
    pub(crate) fn new(process: Arc<ProcessSignals>, steps: Arc<StepSignals>) -> Self {
        ProcessHandle { process, steps }
    }

    pub fn is_pending(&self) -> bool {
        self.process.is_pending()
    }

    /// Arm the breakpoint so the run stops before its next statement.
    pub fn pause(&self) {
        if self.is_pending() {
            debug!("pause requested");
            self.steps.set_breakpoint(true);
        }
    }

    pub fn resume(&self) {
        if self.is_pending() {
            debug!("resume requested");
            self.steps.set_breakpoint(false);
        }
    }

    /// Let a paused run execute one statement.
    pub fn next_step(&self) {
        self.steps.next_step();
    }

    /// Stop the run after its current statement, waking it if paused.
    pub fn exit(&self) -> EvalResult<()> {
        if !self.is_pending() {
            return Err(no_running_process());
        }
        debug!("exit requested");
        self.process.set_exit(true);
        self.steps.notify();
        Ok(())
    }
}
