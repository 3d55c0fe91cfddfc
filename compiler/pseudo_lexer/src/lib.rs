//! Lexer for `PseudoScript`.
//!
//! A single-pass, pull-based scanner: [`Lexer::next_token`] produces one
//! token per call until it returns an end-of-file token. Line breaks and `;`
//! both become `Eol` tokens, which the parser uses as statement terminators.
//!
//! # Error Modes
//!
//! - **Strict** (default): the first error is returned and lexing stops.
//! - **Force**: the error is recorded, the rest of the line is skipped and
//!   scanning resumes. Recorded errors are available via [`Lexer::errors`].

mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

use pseudo_ir::grammar::{
    is_dec_digit, is_end_of_line, is_identifier_part, is_identifier_start, is_keyword,
};
use pseudo_ir::{Keyword, Position, Punct, Span, Token, TokenKind};

/// Lexer configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LexerOptions {
    /// Record errors and keep going instead of failing on the first one.
    pub force: bool,
    /// Columns a tab advances by.
    pub tab_width: u32,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            force: false,
            tab_width: 1,
        }
    }
}

/// Stateful scanner over one source text.
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    token_start: usize,
    line: u32,
    /// Index that maps to column 1 on the current line. Tabs wider than one
    /// column pull it back so later columns line up with the editor.
    offset: i64,
    options: LexerOptions,
    errors: Vec<LexError>,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str, options: LexerOptions) -> Self {
        Lexer {
            chars: source.chars().collect(),
            index: 0,
            token_start: 0,
            line: 1,
            offset: 0,
            options,
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Errors recorded so far in force mode.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Scan the next token.
    ///
    /// After the end of input has been reached every call returns another
    /// `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            match self.scan_token() {
                Ok(token) => return Ok(token),
                Err(err) if self.options.force => {
                    self.errors.push(err);
                    self.skip_to_end_of_line();
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        while self.code_at(0) == '/' && self.code_at(1) == '/' {
            self.token_start = self.index;
            self.skip_to_end_of_line();
        }

        if self.is_eof() {
            self.token_start = self.index;
            return Ok(self.make_token(TokenKind::Eof, "<eof>"));
        }

        let code = self.code_at(0);
        let next = self.code_at(1);
        self.token_start = self.index;

        if is_end_of_line(code) {
            return Ok(self.scan_end_of_line(code, next));
        }

        if is_identifier_start(code) {
            return Ok(self.scan_identifier_or_keyword());
        }

        match code {
            '"' => self.scan_string_literal(),
            '.' if is_dec_digit(next) => Ok(self.scan_numeric_literal()),
            '0'..='9' => Ok(self.scan_numeric_literal()),
            ';' => {
                self.index += 1;
                Ok(self.make_token(TokenKind::Eol, ";"))
            }
            _ => match self.punctuator(code, next) {
                Some(punct) => Ok(self.scan_punctuator(punct)),
                None => Err(LexError::invalid_character(
                    self.span_from(self.token_start, self.index + 1),
                    self.line,
                    code,
                )),
            },
        }
    }

    /// Longest-match punctuator starting with `code`.
    fn punctuator(&self, code: char, next: char) -> Option<Punct> {
        let punct = match (code, next) {
            ('.', _) => Punct::Dot,
            ('=', '=') => Punct::Equal,
            ('=', _) => Punct::Assign,
            ('<', '=') => Punct::LessThanOrEqual,
            ('<', '<') => Punct::LeftShift,
            ('<', _) => Punct::LessThan,
            ('>', '=') => Punct::GreaterThanOrEqual,
            ('>', '>') if self.code_at(2) == '>' => Punct::UnsignedRightShift,
            ('>', '>') => Punct::RightShift,
            ('>', _) => Punct::GreaterThan,
            ('!', '=') => Punct::NotEqual,
            ('-', '=') => Punct::MinusAssign,
            ('-', _) => Punct::Minus,
            ('+', '=') => Punct::PlusAssign,
            ('+', _) => Punct::Plus,
            ('*', '=') => Punct::AsteriskAssign,
            ('*', _) => Punct::Asterisk,
            ('/', '=') => Punct::SlashAssign,
            ('/', _) => Punct::Slash,
            ('^', _) => Punct::Caret,
            ('%', _) => Punct::Percent,
            (':', _) => Punct::Colon,
            (',', _) => Punct::Comma,
            ('{', _) => Punct::LeftBrace,
            ('}', _) => Punct::RightBrace,
            ('[', _) => Punct::LeftBracket,
            (']', _) => Punct::RightBracket,
            ('(', _) => Punct::LeftParen,
            (')', _) => Punct::RightParen,
            ('&', _) => Punct::Ampersand,
            ('|', _) => Punct::Pipe,
            _ => return None,
        };
        Some(punct)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Character at `index + delta`; past the end of input reads as `;`.
    #[inline]
    fn code_at(&self, delta: usize) -> char {
        self.chars.get(self.index + delta).copied().unwrap_or(';')
    }

    fn column(&self, index: usize) -> u32 {
        let column = index as i64 - self.offset + 1;
        u32::try_from(column.max(1)).unwrap_or(u32::MAX)
    }

    fn span_from(&self, start: usize, end: usize) -> Span {
        let to_u32 = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
        Span::new(to_u32(start), to_u32(end))
    }

    fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        self.chars[start.min(end)..end].iter().collect()
    }

    /// Token from `token_start` to the current index on the current line.
    fn make_token(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        Token::new(
            kind,
            value,
            self.span_from(self.token_start, self.index),
            Position::new(self.line, self.column(self.token_start)),
            Position::new(self.line, self.column(self.index)),
        )
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() {
            match self.code_at(0) {
                ' ' => self.index += 1,
                '\t' => {
                    self.offset -= i64::from(self.options.tab_width.saturating_sub(1));
                    self.index += 1;
                }
                _ => break,
            }
        }
    }

    /// Advance up to (not past) the next line break.
    fn skip_to_end_of_line(&mut self) {
        while !self.is_eof() && !is_end_of_line(self.code_at(0)) {
            self.index += 1;
        }
    }

    /// `\n`, `\r`, `\r\n` and `\n\r` each count as one line break.
    fn scan_end_of_line(&mut self, code: char, next: char) -> Token {
        if (code == '\n' && next == '\r') || (code == '\r' && next == '\n') {
            self.index += 1;
        }
        let token = self.make_token(TokenKind::Eol, ";");
        self.index += 1;
        self.start_line();
        token
    }

    fn start_line(&mut self) {
        self.line += 1;
        self.offset = self.index as i64;
    }

    fn scan_string_literal(&mut self) -> Result<Token, LexError> {
        let begin = Position::new(self.line, self.column(self.token_start));
        let begin_line = self.line;
        let content_start = self.index + 1;

        loop {
            self.index += 1;
            if self.is_eof() {
                return Err(LexError::unexpected_string_eol(
                    self.span_from(self.token_start, self.index),
                    begin_line,
                ));
            }
            match self.code_at(0) {
                '"' if self.code_at(1) == '"' => {
                    self.index += 1;
                }
                '"' => break,
                '\n' => {
                    if self.code_at(1) == '\r' {
                        self.index += 1;
                    }
                    self.offset = self.index as i64 + 1;
                    self.line += 1;
                }
                '\r' => {
                    if self.code_at(1) == '\n' {
                        self.index += 1;
                    }
                    self.offset = self.index as i64 + 1;
                    self.line += 1;
                }
                _ => {}
            }
        }

        let value = self.text(content_start, self.index).replace("\"\"", "\"");
        self.index += 1;

        Ok(Token::new(
            TokenKind::StringLiteral,
            value,
            self.span_from(self.token_start, self.index),
            begin,
            Position::new(self.line, self.column(self.index)),
        ))
    }

    /// `digits [. digits] [(e|E) [+|-] digits]`, or the same starting at `.`.
    fn scan_numeric_literal(&mut self) -> Token {
        while is_dec_digit(self.code_at(0)) {
            self.index += 1;
        }

        if self.code_at(0) == '.' {
            self.index += 1;
            while is_dec_digit(self.code_at(0)) {
                self.index += 1;
            }
        }

        if matches!(self.code_at(0), 'e' | 'E') {
            self.index += 1;
            if matches!(self.code_at(0), '+' | '-') {
                self.index += 1;
            }
            while is_dec_digit(self.code_at(0)) {
                self.index += 1;
            }
        }

        let value = self.text(self.token_start, self.index);
        self.make_token(TokenKind::NumericLiteral, value)
    }

    fn scan_punctuator(&mut self, punct: Punct) -> Token {
        self.index += punct.width() as usize;
        self.make_token(TokenKind::Punct(punct), punct.as_str())
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        self.index += 1;
        while !self.is_eof() && is_identifier_part(self.code_at(0)) {
            self.index += 1;
        }

        let mut value = self.text(self.token_start, self.index);

        if is_keyword(&value) {
            if value == "end" {
                // `end if`, `end while`, ... lex as one terminator token.
                if matches!(self.code_at(0), ' ' | '\t') && !self.is_eof() {
                    self.index += 1;
                    while !self.is_eof() && is_identifier_part(self.code_at(0)) {
                        self.index += 1;
                    }
                    value = self.text(self.token_start, self.index);
                }
            } else if value == "else" && self.text(self.token_start, self.index + 3) == "else if"
            {
                let after = self.chars.get(self.index + 3).copied();
                if after.map_or(true, |c| !is_identifier_part(c)) {
                    self.index += 3;
                    value = "else if".to_string();
                }
            }

            if let Some(keyword) = Keyword::from_text(value.trim_end()) {
                return self.make_token(TokenKind::Keyword(keyword), value);
            }
        }

        let kind = match value.as_str() {
            "true" | "false" => TokenKind::BooleanLiteral,
            "null" => TokenKind::NilLiteral,
            _ => TokenKind::Identifier,
        };
        self.make_token(kind, value)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including the first `Eof`, or up to the
    /// first error in strict mode.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token();
        self.finished = item.as_ref().map_or(true, Token::is_eof);
        Some(item)
    }
}

/// Output of [`lex`]: every token up to `Eof`, plus force-mode errors.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Lex a whole source text.
///
/// In strict mode the first error aborts; in force mode errors are
/// collected and the token stream is best-effort.
pub fn lex(source: &str, options: LexerOptions) -> Result<LexOutput, LexError> {
    let mut lexer = Lexer::new(source, options);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    Ok(LexOutput {
        tokens,
        errors: lexer.take_errors(),
    })
}

#[cfg(test)]
mod tests;
