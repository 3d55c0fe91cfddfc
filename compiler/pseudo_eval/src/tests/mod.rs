//! End-to-end tests through the [`Interpreter`] facade.
//!
//! - `scripts`: language behavior observed through printed output
//! - `embedding`: host API, globals, injection and configuration locks
//! - `debugging`: breakpoints, process handles and exit

#![allow(clippy::unwrap_used)]

mod embedding;
mod scripts;

use std::rc::Rc;

use crate::{Interpreter, InterpreterBuilder, MemoryResource, OutputHandler};

pub(super) fn files() -> MemoryResource {
    MemoryResource::new()
        .with(
            "lib/util.src",
            "y = 10\nfunction double(n)\n  return n * 2\nend function",
        )
        .with("lib/broken.src", "z = \nw = 4")
}

/// Builder with buffered output and the in-memory files.
pub(super) fn builder() -> (InterpreterBuilder, Rc<OutputHandler>) {
    let output = Rc::new(OutputHandler::buffer());
    let builder = Interpreter::builder()
        .target("main.src")
        .output(Rc::clone(&output))
        .resource(Rc::new(files()));
    (builder, output)
}

/// Run `source` and return everything it printed.
pub(super) fn run(source: &str) -> Vec<String> {
    let (builder, output) = builder();
    builder.build().run(source).unwrap();
    output.take()
}

/// Run `source` and return the error it raised.
pub(super) fn run_err(source: &str) -> String {
    let (builder, _) = builder();
    builder.build().run(source).unwrap_err().to_string()
}
