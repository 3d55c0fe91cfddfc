//! Recursive descent parser for `PseudoScript`.
//!
//! Produces an owned AST ([`pseudo_ir::Node`]) rooted at a `Chunk`.
//!
//! # Error Recovery
//!
//! In strict mode the first lexer or grammar error is returned. In force
//! mode the error is recorded, an `InvalidCodeExpression` node is put in
//! place of the broken construct, and tokens are skipped up to the next line
//! break so one mistake costs at most one statement.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind, SyntaxError};

use pseudo_ir::{Keyword, Node, NodeKind, Punct, Token};
use pseudo_lexer::{Lexer, LexerOptions};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Parser configuration, forwarded to the lexer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParserOptions {
    pub force: bool,
    pub tab_width: u32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            force: false,
            tab_width: 1,
        }
    }
}

impl From<ParserOptions> for LexerOptions {
    fn from(options: ParserOptions) -> Self {
        LexerOptions {
            force: options.force,
            tab_width: options.tab_width,
        }
    }
}

/// A parsed chunk plus every error recorded in force mode.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub chunk: Node,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutput {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

type PResult<T> = Result<T, SyntaxError>;

/// Parser state for one source text.
pub struct Parser {
    cursor: Cursor,
    force: bool,
    errors: Vec<SyntaxError>,
    namespaces: Vec<String>,
    seen_namespaces: FxHashSet<String>,
}

impl Parser {
    pub fn new(source: &str, options: ParserOptions) -> Self {
        Parser {
            cursor: Cursor::new(Lexer::new(source, options.into())),
            force: options.force,
            errors: Vec::new(),
            namespaces: Vec::new(),
            seen_namespaces: FxHashSet::default(),
        }
    }

    /// Parse the whole source into a `Chunk`.
    pub fn parse_chunk(mut self) -> PResult<ParseOutput> {
        self.next()?;
        let start = self.token().start;
        let mut body = Vec::new();

        loop {
            body.extend(self.parse_block()?);
            if self.token().is_eof() {
                break;
            }
            // A stray `end ...`/`else` at top level.
            let err = ParseError::unexpected_eof(self.token());
            if let Some(invalid) = self.raise_statement(err)? {
                body.push(invalid);
            }
        }

        let end = self.token().end;
        let mut errors: Vec<SyntaxError> = self
            .cursor
            .lexer_mut()
            .take_errors()
            .into_iter()
            .map(SyntaxError::from)
            .collect();
        errors.append(&mut self.errors);

        let chunk = Node::new(
            NodeKind::Chunk {
                body,
                namespaces: self.namespaces,
            },
            start,
            end,
        );
        Ok(ParseOutput { chunk, errors })
    }

    // Cursor delegation

    #[inline]
    fn token(&self) -> &Token {
        self.cursor.current()
    }

    #[inline]
    fn previous(&self) -> &Token {
        self.cursor.previous()
    }

    #[inline]
    fn next(&mut self) -> PResult<()> {
        self.cursor.advance()
    }

    fn record_namespace(&mut self, name: &str) {
        if self.seen_namespaces.insert(name.to_string()) {
            self.namespaces.push(name.to_string());
        }
    }

    /// Report a grammar violation.
    ///
    /// Strict mode returns the error. Force mode records it, skips to the end
    /// of the line and yields a placeholder spanning the offending token.
    /// The line break itself is never skipped.
    fn raise(&mut self, err: ParseError) -> PResult<Node> {
        if !self.force {
            return Err(err.into());
        }

        trace!(error = %err, "recovering");
        let invalid = Node::invalid(self.token().start, self.token().end);
        self.errors.push(err.into());
        while !self.token().is_terminator() {
            self.next()?;
        }
        Ok(invalid)
    }

    fn raise_statement(&mut self, err: ParseError) -> PResult<Option<Node>> {
        self.raise(err).map(Some)
    }

    fn expect_punct(&mut self, punct: Punct) -> PResult<()> {
        if self.cursor.consume_punct(punct)? {
            return Ok(());
        }
        let err = ParseError::unexpected_value(self.token(), punct.as_str());
        self.raise(err).map(drop)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        if self.cursor.consume_keyword(keyword)? {
            return Ok(());
        }
        let err = ParseError::unexpected_value(self.token(), keyword.as_str());
        self.raise(err).map(drop)
    }

    /// Close a single-line body: `;`, a line break, end of input, or the
    /// block's own `end` terminator.
    ///
    /// Line breaks are left for the enclosing block so a shortcut body nested
    /// in another shortcut body ends both.
    fn expect_shortcut_end(&mut self, terminator: Keyword) -> PResult<()> {
        if self.token().is_terminator() || self.cursor.consume_keyword(terminator)? {
            return Ok(());
        }
        let err = ParseError::unexpected_values(self.token(), &[";", "<eof>"]);
        self.raise(err).map(drop)
    }
}

/// Parse `source` into a chunk.
pub fn parse(source: &str, options: ParserOptions) -> PResult<ParseOutput> {
    Parser::new(source, options).parse_chunk()
}

#[cfg(test)]
mod tests;
