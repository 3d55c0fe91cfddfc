//! Host-facing handlers.
//!
//! A run talks to its host through three handlers bundled in a
//! [`HandlerContainer`]: where `print` goes, what happens to errors, and
//! how `import` paths and run targets are located and read.

mod error;
mod output;
mod resource;

pub use error::{Collect, ErrorHandler, Rethrow};
pub use output::{Output, OutputHandler};
pub use resource::{FileResource, MemoryResource, ResourceHandler};

use std::rc::Rc;

/// The handler set shared by every context of an interpreter.
#[derive(Clone)]
pub struct HandlerContainer {
    pub output: Rc<OutputHandler>,
    pub error: Rc<dyn ErrorHandler>,
    pub resource: Rc<dyn ResourceHandler>,
}

impl Default for HandlerContainer {
    fn default() -> Self {
        HandlerContainer {
            output: Rc::new(OutputHandler::Stdout),
            error: Rc::new(Rethrow),
            resource: Rc::new(FileResource),
        }
    }
}
