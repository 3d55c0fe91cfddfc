//! Error routing policy.

use parking_lot::Mutex;

use crate::ScriptError;

/// Decides what happens to an error raised during a run.
///
/// Returning `Err` aborts the run and hands the error back to the caller;
/// returning `Ok` swallows it.
pub trait ErrorHandler {
    fn raise(&self, error: ScriptError) -> Result<(), ScriptError>;
}

/// Hands every error back to the caller (default).
pub struct Rethrow;

impl ErrorHandler for Rethrow {
    fn raise(&self, error: ScriptError) -> Result<(), ScriptError> {
        Err(error)
    }
}

/// Records errors and lets the caller carry on.
#[derive(Default)]
pub struct Collect {
    errors: Mutex<Vec<ScriptError>>,
}

impl Collect {
    pub fn new() -> Self {
        Collect::default()
    }

    pub fn errors(&self) -> Vec<ScriptError> {
        self.errors.lock().clone()
    }

    pub fn take(&self) -> Vec<ScriptError> {
        std::mem::take(&mut *self.errors.lock())
    }
}

impl ErrorHandler for Collect {
    fn raise(&self, error: ScriptError) -> Result<(), ScriptError> {
        self.errors.lock().push(error);
        Ok(())
    }
}
