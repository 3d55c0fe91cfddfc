//! Lexer error types.

use std::fmt;

use pseudo_ir::Span;

/// A lexer error with the line it was raised on.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    /// 1-based line.
    pub line: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A string literal ran into end of input before its closing quote.
    UnexpectedStringEol,
    /// A character that starts no token.
    InvalidCharacter(char),
}

impl LexError {
    #[cold]
    pub fn unexpected_string_eol(span: Span, line: u32) -> Self {
        LexError {
            kind: LexErrorKind::UnexpectedStringEol,
            span,
            line,
        }
    }

    #[cold]
    pub fn invalid_character(span: Span, line: u32, found: char) -> Self {
        LexError {
            kind: LexErrorKind::InvalidCharacter(found),
            span,
            line,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::UnexpectedStringEol => {
                write!(f, "Unexpected string ending at line {}.", self.line)
            }
            LexErrorKind::InvalidCharacter(c) => {
                write!(f, "Invalid character {c} at line {}.", self.line)
            }
        }
    }
}

impl std::error::Error for LexError {}
