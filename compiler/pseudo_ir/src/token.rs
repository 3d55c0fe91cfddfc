//! Token types produced by the lexer.

use std::fmt;

use crate::{Position, Span};

/// A single lexed token.
///
/// `value` holds the token's text after unescaping (string literals) or
/// normalization (end-of-line tokens always carry `";"`, end-of-file carries
/// `"<eof>"`). `start`/`end` are the 1-based positions of the first and one
/// past the last character; a string literal spanning several lines ends on
/// the line where its closing quote is.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
    pub start: Position,
    pub end: Position,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        value: impl Into<String>,
        span: Span,
        start: Position,
        end: Position,
    ) -> Self {
        Token {
            kind,
            value: value.into(),
            span,
            start,
            end,
        }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.start.line
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    #[inline]
    pub fn is_eol(&self) -> bool {
        self.kind == TokenKind::Eol
    }

    /// End of statement: either a line break / `;`, or end of input.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, TokenKind::Eol | TokenKind::Eof)
    }

    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    #[inline]
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    /// True for every literal token, `null` included.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::BooleanLiteral
                | TokenKind::NilLiteral
        )
    }

    pub fn is_non_nil_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::StringLiteral | TokenKind::NumericLiteral | TokenKind::BooleanLiteral
        )
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) @ {}", self.kind, self.value, self.start)
    }
}

/// Token classification.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Newline or `;`.
    Eol,
    Eof,
    Keyword(Keyword),
    Identifier,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NilLiteral,
    Punct(Punct),
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Eol => "EOL",
            TokenKind::Eof => "EOF",
            TokenKind::Keyword(_) => "Keyword",
            TokenKind::Identifier => "Identifier",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::NumericLiteral => "NumericLiteral",
            TokenKind::BooleanLiteral => "BooleanLiteral",
            TokenKind::NilLiteral => "NilLiteral",
            TokenKind::Punct(_) => "Punctuator",
        }
    }
}

/// Reserved words.
///
/// `end` always swallows the word that follows it, so block terminators
/// arrive as a single token (`end if`). Terminators that don't close a
/// known block become [`Keyword::End`] and keep their text in `Token::value`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Keyword {
    If,
    In,
    Or,
    And,
    For,
    Not,
    New,
    Else,
    ElseIf,
    Then,
    Break,
    While,
    Return,
    Import,
    Function,
    Continue,
    Debugger,
    EndIf,
    EndFor,
    EndWhile,
    EndFunction,
    End,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::In => "in",
            Keyword::Or => "or",
            Keyword::And => "and",
            Keyword::For => "for",
            Keyword::Not => "not",
            Keyword::New => "new",
            Keyword::Else => "else",
            Keyword::ElseIf => "else if",
            Keyword::Then => "then",
            Keyword::Break => "break",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Import => "import",
            Keyword::Function => "function",
            Keyword::Continue => "continue",
            Keyword::Debugger => "debugger",
            Keyword::EndIf => "end if",
            Keyword::EndFor => "end for",
            Keyword::EndWhile => "end while",
            Keyword::EndFunction => "end function",
            Keyword::End => "end",
        }
    }

    /// Classify the text of a keyword token (after compound merging).
    pub fn from_text(text: &str) -> Option<Keyword> {
        let keyword = match text {
            "if" => Keyword::If,
            "in" => Keyword::In,
            "or" => Keyword::Or,
            "and" => Keyword::And,
            "for" => Keyword::For,
            "not" => Keyword::Not,
            "new" => Keyword::New,
            "else" => Keyword::Else,
            "else if" => Keyword::ElseIf,
            "then" => Keyword::Then,
            "break" => Keyword::Break,
            "while" => Keyword::While,
            "return" => Keyword::Return,
            "import" => Keyword::Import,
            "function" => Keyword::Function,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "end if" => Keyword::EndIf,
            "end for" => Keyword::EndFor,
            "end while" => Keyword::EndWhile,
            "end function" => Keyword::EndFunction,
            _ if text.starts_with("end") => Keyword::End,
            _ => return None,
        };
        Some(keyword)
    }

    /// `else`, `else if` and every `end ...` terminator close a block.
    pub const fn closes_block(self) -> bool {
        matches!(
            self,
            Keyword::Else
                | Keyword::ElseIf
                | Keyword::EndIf
                | Keyword::EndFor
                | Keyword::EndWhile
                | Keyword::EndFunction
                | Keyword::End
        )
    }
}

/// Operators and delimiters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Punct {
    Dot,
    Assign,
    Equal,
    LessThan,
    LessThanOrEqual,
    LeftShift,
    GreaterThan,
    GreaterThanOrEqual,
    RightShift,
    UnsignedRightShift,
    NotEqual,
    Minus,
    MinusAssign,
    Plus,
    PlusAssign,
    Asterisk,
    AsteriskAssign,
    Slash,
    SlashAssign,
    Caret,
    Percent,
    Colon,
    Comma,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Ampersand,
    Pipe,
}

impl Punct {
    pub const fn as_str(self) -> &'static str {
        match self {
            Punct::Dot => ".",
            Punct::Assign => "=",
            Punct::Equal => "==",
            Punct::LessThan => "<",
            Punct::LessThanOrEqual => "<=",
            Punct::LeftShift => "<<",
            Punct::GreaterThan => ">",
            Punct::GreaterThanOrEqual => ">=",
            Punct::RightShift => ">>",
            Punct::UnsignedRightShift => ">>>",
            Punct::NotEqual => "!=",
            Punct::Minus => "-",
            Punct::MinusAssign => "-=",
            Punct::Plus => "+",
            Punct::PlusAssign => "+=",
            Punct::Asterisk => "*",
            Punct::AsteriskAssign => "*=",
            Punct::Slash => "/",
            Punct::SlashAssign => "/=",
            Punct::Caret => "^",
            Punct::Percent => "%",
            Punct::Colon => ":",
            Punct::Comma => ",",
            Punct::LeftBrace => "{",
            Punct::RightBrace => "}",
            Punct::LeftBracket => "[",
            Punct::RightBracket => "]",
            Punct::LeftParen => "(",
            Punct::RightParen => ")",
            Punct::Ampersand => "&",
            Punct::Pipe => "|",
        }
    }

    /// Length in characters of the punctuator's source text.
    #[inline]
    pub const fn width(self) -> u32 {
        self.as_str().len() as u32
    }

    /// The operator applied by a compound assignment (`+=` applies `+`).
    pub const fn compound_operator(self) -> Option<Punct> {
        match self {
            Punct::PlusAssign => Some(Punct::Plus),
            Punct::MinusAssign => Some(Punct::Minus),
            Punct::AsteriskAssign => Some(Punct::Asterisk),
            Punct::SlashAssign => Some(Punct::Slash),
            _ => None,
        }
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
