//! `PseudoScript` IR - shared front-end vocabulary
//!
//! This crate contains the data structures that flow between the lexer,
//! the parser and the runtime:
//! - `Position`/`Span` for source locations
//! - `Token`/`TokenKind` produced by the lexer
//! - Grammar classification tables (keywords, literals, operator precedence)
//! - The AST (`Node`, `NodeKind`) produced by the parser
//!
//! Nothing here performs I/O or evaluation. Every type is plain owned data
//! so that AST nodes can be lowered and then dropped independently of the
//! source text.

pub mod ast;
pub mod grammar;
mod span;
mod token;

pub use ast::{
    BinaryOperator, ClauseKind, IfClause, LiteralValue, MapField, Node, NodeKind, Parameter,
    UnaryOperator,
};
pub use span::{Position, Span};
pub use token::{Keyword, Punct, Token, TokenKind};
