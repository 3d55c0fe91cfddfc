//! Stateless grammar classification tables.
//!
//! The lexer uses the character predicates and the keyword lookup; the
//! parser uses the shortcut-block terminators and literal sets.

use crate::{Keyword, Token, TokenKind};

/// Check whether `text` is a reserved word.
///
/// Keywords are bucketed by length, so anything outside 2..=8 characters
/// (or of length 7) is rejected without a comparison. `true`, `false` and
/// `null` are literals, not keywords.
pub fn is_keyword(text: &str) -> bool {
    match text.len() {
        2 => matches!(text, "if" | "in" | "or"),
        3 => matches!(text, "and" | "end" | "for" | "not" | "new"),
        4 => matches!(text, "else" | "then"),
        5 => matches!(text, "break" | "while"),
        6 => matches!(text, "return" | "import"),
        8 => matches!(text, "function" | "continue" | "debugger"),
        _ => false,
    }
}

/// Horizontal whitespace. Tabs are weighted by the lexer's tab width.
#[inline]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

#[inline]
pub const fn is_end_of_line(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// ASCII letters, `_`, and every non-ASCII code point.
#[inline]
pub const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 128
}

#[inline]
pub const fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

#[inline]
pub const fn is_dec_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Tokens that end a single-line (shortcut) body.
///
/// `if` is deliberately absent: `if a then if b then c` nests on one line.
pub fn is_breaking_shortcut(token: &Token) -> bool {
    match token.kind {
        TokenKind::Eof => true,
        TokenKind::Keyword(keyword) => matches!(
            keyword,
            Keyword::Else
                | Keyword::ElseIf
                | Keyword::EndFor
                | Keyword::EndWhile
                | Keyword::EndFunction
                | Keyword::EndIf
        ),
        _ => false,
    }
}

/// Tokens after which a multi-line block stops collecting statements.
pub fn is_block_follow(token: &Token) -> bool {
    match token.kind {
        TokenKind::Eof => true,
        TokenKind::Keyword(keyword) => keyword.closes_block(),
        _ => false,
    }
}
