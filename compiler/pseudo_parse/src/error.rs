//! Parse error types.
//!
//! [`ParseError`] covers grammar violations. [`SyntaxError`] is what the
//! parser hands back: either a grammar violation or a lexer error surfaced
//! while pulling tokens.

use std::fmt;

use pseudo_ir::{Position, Token};
use pseudo_lexer::LexError;

/// A grammar violation at a specific token.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Text of the offending token.
    pub found: String,
    /// Start of the offending token.
    pub position: Position,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was required.
    UnexpectedValue { expected: &'static str },
    /// One of several tokens was required.
    UnexpectedValues { expected: Vec<&'static str> },
    UnexpectedIdentifier,
    /// Something other than `(` followed a callee.
    UnexpectedArguments { node: &'static str },
    UnexpectedAssignmentOrCall,
    UnexpectedExpression,
    UnexpectedParameterInFunction,
    UnexpectedEof,
    UnexpectedImport,
    /// The `(` of a call starts on a later line than its callee.
    CallExpressionEol { previous_line: u32 },
}

impl ParseError {
    fn at(kind: ParseErrorKind, token: &Token) -> Self {
        ParseError {
            kind,
            found: token.value.clone(),
            position: token.start,
        }
    }

    #[cold]
    pub fn unexpected_value(token: &Token, expected: &'static str) -> Self {
        Self::at(ParseErrorKind::UnexpectedValue { expected }, token)
    }

    #[cold]
    pub fn unexpected_values(token: &Token, expected: &[&'static str]) -> Self {
        Self::at(
            ParseErrorKind::UnexpectedValues {
                expected: expected.to_vec(),
            },
            token,
        )
    }

    #[cold]
    pub fn unexpected_identifier(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedIdentifier, token)
    }

    #[cold]
    pub fn unexpected_arguments(token: &Token, node: &'static str) -> Self {
        Self::at(ParseErrorKind::UnexpectedArguments { node }, token)
    }

    #[cold]
    pub fn unexpected_assignment_or_call(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedAssignmentOrCall, token)
    }

    #[cold]
    pub fn unexpected_expression(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedExpression, token)
    }

    #[cold]
    pub fn unexpected_parameter(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedParameterInFunction, token)
    }

    #[cold]
    pub fn unexpected_eof(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedEof, token)
    }

    #[cold]
    pub fn unexpected_import(token: &Token) -> Self {
        Self::at(ParseErrorKind::UnexpectedImport, token)
    }

    #[cold]
    pub fn call_expression_eol(token: &Token, previous: &Token) -> Self {
        Self::at(
            ParseErrorKind::CallExpressionEol {
                previous_line: previous.line(),
            },
            token,
        )
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.line();
        let found = &self.found;
        match &self.kind {
            ParseErrorKind::UnexpectedValue { expected } => write!(
                f,
                "Unexpected value {found} at line {line}. Expected: {expected}."
            ),
            ParseErrorKind::UnexpectedValues { expected } => write!(
                f,
                "Unexpected value {found} at line {line}. Expected one of: {}.",
                expected.join(", ")
            ),
            ParseErrorKind::UnexpectedIdentifier => {
                write!(f, "Unexpected identifier {found} at line {line}.")
            }
            ParseErrorKind::UnexpectedArguments { node } => write!(
                f,
                "{node} received unexpected arguments {found} at line {line}."
            ),
            ParseErrorKind::UnexpectedAssignmentOrCall => {
                write!(f, "Unexpected assignment or call at line {line}.")
            }
            ParseErrorKind::UnexpectedExpression => {
                write!(f, "Unexpected expression at line {line}.")
            }
            ParseErrorKind::UnexpectedParameterInFunction => write!(
                f,
                "Unexpected parameter in function declaration at line {line}."
            ),
            ParseErrorKind::UnexpectedEof => write!(f, "Unexpected end of file at line {line}."),
            ParseErrorKind::UnexpectedImport => write!(f, "Unexpected import path at {line}."),
            ParseErrorKind::CallExpressionEol { previous_line } => write!(
                f,
                "Call expressions do not support multiline arguments. \
                 Discrepancy found between {previous_line} and {line}."
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Any error the front end can produce.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SyntaxError {
    Lex(LexError),
    Parse(ParseError),
}

impl SyntaxError {
    pub fn line(&self) -> u32 {
        match self {
            SyntaxError::Lex(err) => err.line,
            SyntaxError::Parse(err) => err.line(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Lex(err) => err.fmt(f),
            SyntaxError::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyntaxError::Lex(err) => Some(err),
            SyntaxError::Parse(err) => Some(err),
        }
    }
}

impl From<LexError> for SyntaxError {
    fn from(err: LexError) -> Self {
        SyntaxError::Lex(err)
    }
}

impl From<ParseError> for SyntaxError {
    fn from(err: ParseError) -> Self {
        SyntaxError::Parse(err)
    }
}
