//! `InterpreterBuilder` for creating Interpreter instances.

use std::rc::Rc;

use pseudo_parse::ParserOptions;

use super::Interpreter;
use crate::debugger::{Debugger, Interact};
use crate::handler::{ErrorHandler, HandlerContainer, OutputHandler, ResourceHandler};
use crate::value::ScriptMap;
use crate::Value;

/// Builder for [`Interpreter`].
///
/// Everything is optional: the defaults are target `"unknown"`, the
/// built-in API only, no arguments, stdout output, file resources,
/// rethrowing errors and strict parsing.
#[derive(Default)]
pub struct InterpreterBuilder {
    target: Option<String>,
    api: ScriptMap,
    argv: Vec<String>,
    handlers: HandlerContainer,
    interact: Option<Rc<dyn Interact>>,
    options: ParserOptions,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder::default()
    }

    /// Name of the code being run; imports resolve relative to it.
    #[must_use]
    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// Host table merged over the built-in API.
    #[must_use]
    pub fn api(mut self, api: ScriptMap) -> Self {
        self.api = api;
        self
    }

    /// Add one host API entry.
    #[must_use]
    pub fn define(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.api.insert(name, value.into());
        self
    }

    /// Bound to the global `params` on every run.
    #[must_use]
    pub fn argv<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = argv.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn output(mut self, output: Rc<OutputHandler>) -> Self {
        self.handlers.output = output;
        self
    }

    #[must_use]
    pub fn resource(mut self, resource: Rc<dyn ResourceHandler>) -> Self {
        self.handlers.resource = resource;
        self
    }

    #[must_use]
    pub fn error(mut self, error: Rc<dyn ErrorHandler>) -> Self {
        self.handlers.error = error;
        self
    }

    /// Hook called whenever execution pauses on a breakpoint.
    #[must_use]
    pub fn debugger(mut self, interact: Rc<dyn Interact>) -> Self {
        self.interact = Some(interact);
        self
    }

    /// Record syntax errors and keep parsing instead of failing.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.options.force = force;
        self
    }

    #[must_use]
    pub fn tab_width(mut self, tab_width: u32) -> Self {
        self.options.tab_width = tab_width;
        self
    }

    pub fn build(self) -> Interpreter {
        let debugger = match self.interact {
            Some(interact) => Debugger::with_interact(interact),
            None => Debugger::new(),
        };
        Interpreter::from_parts(
            self.target.as_deref().unwrap_or("unknown"),
            self.api,
            self.argv,
            self.handlers,
            debugger,
            self.options,
        )
    }
}
