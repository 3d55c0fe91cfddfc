//! Pseudo Eval - Runtime for PseudoScript.
//!
//! Source text goes through `pseudo_parse`, is lowered by [`Cps`] into an
//! [`Operation`] tree and then walked against a chain of [`Context`]s.
//!
//! # Architecture
//!
//! - `value`: the closed [`Value`] sum type, paths and callables
//! - `intrinsics`: the built-in API table and per-type method tables
//! - `context`: frames, scope resolution, process and control-flow state
//! - `operation`: the executable tree and its evaluation
//! - `cps`: AST lowering, including import resolution
//! - `handler`: output, error and resource policies supplied by the host
//! - `debugger`: breakpoint stepping and the host interaction hook
//! - `interpreter`: the embedding facade and cross-thread [`ProcessHandle`]
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use pseudo_eval::{Interpreter, OutputHandler};
//!
//! let output = Rc::new(OutputHandler::buffer());
//! let interpreter = Interpreter::builder().output(Rc::clone(&output)).build();
//! interpreter.run("print(1 + 2)").unwrap();
//! assert_eq!(output.take(), vec!["3".to_string()]);
//! ```

pub mod context;
pub mod cps;
pub mod debugger;
pub mod errors;
pub mod handler;
pub mod interpreter;
pub mod intrinsics;
pub mod operation;
pub mod tracing_setup;
pub mod value;

pub use context::{Context, ContextKind, ContextState, FunctionState, LoopState};
pub use cps::Cps;
pub use debugger::{Debugger, Interact, NoInteract};
pub use errors::{host_error, EvalError, EvalErrorKind, EvalResult, ScriptError};
pub use handler::{
    Collect, ErrorHandler, FileResource, HandlerContainer, MemoryResource, Output, OutputHandler,
    ResourceHandler, Rethrow,
};
pub use interpreter::{Interpreter, InterpreterBuilder, ProcessHandle};
pub use intrinsics::{builtin_api, Intrinsics};
pub use operation::Operation;
pub use tracing_setup::init_tracing;
pub use value::{format_number, Function, Interface, NativeCall, NativeFn, Path, ScriptMap, Shared, Value};

#[cfg(test)]
mod tests;
