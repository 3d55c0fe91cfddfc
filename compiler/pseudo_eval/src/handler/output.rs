//! Where `print` writes.
//!
//! Enum dispatch covers the common sinks; anything else goes through the
//! boxed [`Output`] trait.

use parking_lot::Mutex;

/// A host-defined sink.
pub trait Output {
    fn print(&self, message: &str);
}

#[derive(Default)]
pub enum OutputHandler {
    /// One line per message on stdout.
    #[default]
    Stdout,
    /// Collects lines for tests and embedding hosts.
    Buffer(Mutex<Vec<String>>),
    /// Discards everything.
    Silent,
    Host(Box<dyn Output>),
}

impl OutputHandler {
    pub fn buffer() -> Self {
        OutputHandler::Buffer(Mutex::new(Vec::new()))
    }

    pub fn host(output: impl Output + 'static) -> Self {
        OutputHandler::Host(Box::new(output))
    }

    pub fn print(&self, message: &str) {
        match self {
            OutputHandler::Stdout => println!("{message}"),
            OutputHandler::Buffer(lines) => lines.lock().push(message.to_string()),
            OutputHandler::Silent => {}
            OutputHandler::Host(output) => output.print(message),
        }
    }

    /// Captured lines so far. Empty for handlers that don't capture.
    pub fn lines(&self) -> Vec<String> {
        match self {
            OutputHandler::Buffer(lines) => lines.lock().clone(),
            _ => Vec::new(),
        }
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        match self {
            OutputHandler::Buffer(lines) => std::mem::take(&mut *lines.lock()),
            _ => Vec::new(),
        }
    }
}
