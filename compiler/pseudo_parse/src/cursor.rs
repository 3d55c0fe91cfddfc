//! Token cursor with a prefetch queue.
//!
//! Tokens are pulled from the lexer lazily. The parser mostly looks at the
//! current token, occasionally one further (`.` followed by a number, a
//! literal followed by `.`), so the queue rarely holds more than one token.

use std::collections::VecDeque;

use pseudo_ir::{Keyword, Position, Punct, Span, Token, TokenKind};
use pseudo_lexer::Lexer;

use crate::SyntaxError;

pub struct Cursor {
    lexer: Lexer,
    prefetched: VecDeque<Token>,
    token: Token,
    previous: Token,
}

fn placeholder() -> Token {
    let start = Position::new(1, 1);
    Token::new(TokenKind::Eol, ";", Span::DUMMY, start, start)
}

impl Cursor {
    pub fn new(lexer: Lexer) -> Self {
        Cursor {
            lexer,
            prefetched: VecDeque::new(),
            token: placeholder(),
            previous: placeholder(),
        }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.token
    }

    #[inline]
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    /// Move to the next token.
    pub fn advance(&mut self) -> Result<(), SyntaxError> {
        let next = match self.prefetched.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        self.previous = std::mem::replace(&mut self.token, next);
        Ok(())
    }

    /// The token after the current one.
    pub fn peek(&mut self) -> Result<&Token, SyntaxError> {
        if self.prefetched.is_empty() {
            let next = self.lexer.next_token()?;
            self.prefetched.push_back(next);
        }
        Ok(&self.prefetched[0])
    }

    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.token.is_keyword(keyword)
    }

    #[inline]
    pub fn check_punct(&self, punct: Punct) -> bool {
        self.token.is_punct(punct)
    }

    /// Advance past the current token if it is `punct`.
    pub fn consume_punct(&mut self, punct: Punct) -> Result<bool, SyntaxError> {
        if self.check_punct(punct) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn consume_keyword(&mut self, keyword: Keyword) -> Result<bool, SyntaxError> {
        if self.check_keyword(keyword) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Advance past a line break or `;`.
    pub fn consume_eol(&mut self) -> Result<bool, SyntaxError> {
        if self.token.is_eol() {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Advance past a line break, `;`, or end of input.
    pub fn consume_terminator(&mut self) -> Result<bool, SyntaxError> {
        if self.token.is_terminator() {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }
}
