//! Runtime errors.
//!
//! [`EvalError`] is raised by lowering and evaluation. [`ScriptError`] is what
//! the interpreter facade reports: a lexer, parser or runtime failure with
//! the exception prefix hosts match on.

use std::fmt;

use pseudo_lexer::LexError;
use pseudo_parse::{ParseError, SyntaxError};

use crate::value::Path;

/// Result of evaluating one operation.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// A runtime or lowering failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Line of the statement that failed, once known.
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Control flow outside its construct
    UnexpectedReturn,
    UnexpectedBreak,
    UnexpectedContinue,

    // Values
    NotInstantiable,
    NotCallable,
    NotIterable { type_name: String },
    CannotGetPath { path: String },
    CannotSetPath { path: String },
    ImmutableString,
    ImmutableInterface,
    ListIndexOutOfRange { index: i64 },
    StringIndexOutOfRange { index: i64 },

    // Lowering
    UnknownUnary,
    UnexpectedAstType { name: &'static str },
    ImportNotFound { path: String },
    TargetNotFound { target: String },

    // Process control
    NoRunningProcess,
    ProcessAlreadyRunning,
    CannotInject,
    TargetLocked,
    ApiLocked,
    HandlerLocked,
    DebuggerLocked,

    /// Raised by a host function.
    Host { message: String },
}

impl EvalError {
    #[inline]
    fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, line: None }
    }

    /// Attach `line` unless a more precise one is already set.
    #[must_use]
    pub fn or_line(mut self, line: u32) -> Self {
        self.line.get_or_insert(line);
        self
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cold]
pub fn unexpected_return() -> EvalError {
    EvalError::new(EvalErrorKind::UnexpectedReturn)
}

#[cold]
pub fn unexpected_break() -> EvalError {
    EvalError::new(EvalErrorKind::UnexpectedBreak)
}

#[cold]
pub fn unexpected_continue() -> EvalError {
    EvalError::new(EvalErrorKind::UnexpectedContinue)
}

#[cold]
pub fn not_instantiable() -> EvalError {
    EvalError::new(EvalErrorKind::NotInstantiable)
}

#[cold]
pub fn not_callable() -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable)
}

#[cold]
pub fn not_iterable(type_name: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::NotIterable {
        type_name: type_name.into(),
    })
}

#[cold]
pub fn cannot_get_path(path: &Path) -> EvalError {
    EvalError::new(EvalErrorKind::CannotGetPath {
        path: path.to_string(),
    })
}

#[cold]
pub fn cannot_set_path(path: &Path) -> EvalError {
    EvalError::new(EvalErrorKind::CannotSetPath {
        path: path.to_string(),
    })
}

#[cold]
pub fn immutable_string() -> EvalError {
    EvalError::new(EvalErrorKind::ImmutableString)
}

#[cold]
pub fn immutable_interface() -> EvalError {
    EvalError::new(EvalErrorKind::ImmutableInterface)
}

#[cold]
pub fn list_index_out_of_range(index: i64) -> EvalError {
    EvalError::new(EvalErrorKind::ListIndexOutOfRange { index })
}

#[cold]
pub fn string_index_out_of_range(index: i64) -> EvalError {
    EvalError::new(EvalErrorKind::StringIndexOutOfRange { index })
}

#[cold]
pub fn unknown_unary() -> EvalError {
    EvalError::new(EvalErrorKind::UnknownUnary)
}

#[cold]
pub fn unexpected_ast_type(name: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::UnexpectedAstType { name })
}

#[cold]
pub fn import_not_found(path: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::ImportNotFound { path: path.into() })
}

#[cold]
pub fn target_not_found(target: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::TargetNotFound {
        target: target.into(),
    })
}

#[cold]
pub fn no_running_process() -> EvalError {
    EvalError::new(EvalErrorKind::NoRunningProcess)
}

#[cold]
pub fn process_already_running() -> EvalError {
    EvalError::new(EvalErrorKind::ProcessAlreadyRunning)
}

#[cold]
pub fn cannot_inject() -> EvalError {
    EvalError::new(EvalErrorKind::CannotInject)
}

#[cold]
pub fn target_locked() -> EvalError {
    EvalError::new(EvalErrorKind::TargetLocked)
}

#[cold]
pub fn api_locked() -> EvalError {
    EvalError::new(EvalErrorKind::ApiLocked)
}

#[cold]
pub fn handler_locked() -> EvalError {
    EvalError::new(EvalErrorKind::HandlerLocked)
}

#[cold]
pub fn debugger_locked() -> EvalError {
    EvalError::new(EvalErrorKind::DebuggerLocked)
}

/// An error raised by host code, shown verbatim.
#[cold]
pub fn host_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Host {
        message: message.into(),
    })
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EvalErrorKind::UnexpectedReturn => write!(f, "Unexpected return statement."),
            EvalErrorKind::UnexpectedBreak => write!(f, "Unexpected break statement."),
            EvalErrorKind::UnexpectedContinue => write!(f, "Unexpected continue statement."),
            EvalErrorKind::NotInstantiable => write!(f, "Only maps can be iniated"),
            EvalErrorKind::NotCallable => write!(f, "Unexpected handle for function call."),
            EvalErrorKind::NotIterable { type_name } => {
                write!(f, "Cannot iterate over {type_name}.")
            }
            EvalErrorKind::CannotGetPath { path } => write!(f, "Cannot get path {path}."),
            EvalErrorKind::CannotSetPath { path } => write!(f, "Cannot set path {path}."),
            EvalErrorKind::ImmutableString => {
                write!(f, "Mutable operations are not allowed on string.")
            }
            EvalErrorKind::ImmutableInterface => write!(f, "Cannot set property on an interface"),
            EvalErrorKind::ListIndexOutOfRange { index } => {
                write!(f, "Index error (list index {index} out of range).")
            }
            EvalErrorKind::StringIndexOutOfRange { index } => {
                write!(f, "Index error (string index {index} out of range).")
            }
            EvalErrorKind::UnknownUnary => write!(f, "Unknown unary expression."),
            EvalErrorKind::UnexpectedAstType { name } => write!(f, "Unexpected AST type {name}."),
            EvalErrorKind::ImportNotFound { path } => write!(f, "Cannot find import {path}."),
            EvalErrorKind::TargetNotFound { target } => write!(f, "Cannot find target {target}."),
            EvalErrorKind::NoRunningProcess => write!(f, "No running process was found."),
            EvalErrorKind::ProcessAlreadyRunning => write!(f, "Process already running."),
            EvalErrorKind::CannotInject => write!(f, "Unable to inject into last context."),
            EvalErrorKind::TargetLocked => {
                write!(f, "You cannot set a target while a process is running.")
            }
            EvalErrorKind::ApiLocked => {
                write!(f, "You cannot set an api while a process is running.")
            }
            EvalErrorKind::HandlerLocked => {
                write!(f, "You cannot set a handler while a process is running.")
            }
            EvalErrorKind::DebuggerLocked => {
                write!(f, "You cannot set a output handler while a process is running.")
            }
            EvalErrorKind::Host { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for EvalError {}

/// Any failure surfaced to the host.
///
/// `Display` renders `"{prefix}: {message}"`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("LexerException: {0}")]
    Lexer(LexError),
    #[error("ParserException: {0}")]
    Parser(ParseError),
    #[error("InterpreterException: {0}")]
    Interpreter(EvalError),
}

impl ScriptError {
    pub const fn prefix(&self) -> &'static str {
        match self {
            ScriptError::Lexer(_) => "LexerException",
            ScriptError::Parser(_) => "ParserException",
            ScriptError::Interpreter(_) => "InterpreterException",
        }
    }

    /// The message without its prefix.
    pub fn message(&self) -> String {
        match self {
            ScriptError::Lexer(err) => err.message(),
            ScriptError::Parser(err) => err.message(),
            ScriptError::Interpreter(err) => err.message(),
        }
    }

    /// 1-based source line, when known.
    pub fn line(&self) -> Option<u32> {
        match self {
            ScriptError::Lexer(err) => Some(err.line),
            ScriptError::Parser(err) => Some(err.line()),
            ScriptError::Interpreter(err) => err.line,
        }
    }

    /// The runtime error, if this is one.
    pub fn as_eval(&self) -> Option<&EvalError> {
        match self {
            ScriptError::Interpreter(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvalError> for ScriptError {
    fn from(err: EvalError) -> Self {
        ScriptError::Interpreter(err)
    }
}

impl From<SyntaxError> for ScriptError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lex(err) => ScriptError::Lexer(err),
            SyntaxError::Parse(err) => ScriptError::Parser(err),
        }
    }
}
