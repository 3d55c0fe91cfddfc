//! Binary and unary operators.

use crate::{Keyword, Punct, Token, TokenKind};

/// Binary operators, both arithmetic/comparison and logical.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,

    // Bitwise
    BitOr,
    BitAnd,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,

    // Comparison
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Equal,
    NotEqual,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    /// Map an expression-operator token to its operator.
    ///
    /// Returns `None` for everything else, including compound assignments.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Keyword(Keyword::Or) => Some(Self::Or),
            TokenKind::Keyword(Keyword::And) => Some(Self::And),
            TokenKind::Punct(punct) => Self::from_punct(punct),
            _ => None,
        }
    }

    pub const fn from_punct(punct: Punct) -> Option<Self> {
        let op = match punct {
            Punct::Pipe => Self::BitOr,
            Punct::Ampersand => Self::BitAnd,
            Punct::Caret => Self::BitXor,
            Punct::LeftShift => Self::LeftShift,
            Punct::RightShift => Self::RightShift,
            Punct::UnsignedRightShift => Self::UnsignedRightShift,
            Punct::LessThan => Self::LessThan,
            Punct::GreaterThan => Self::GreaterThan,
            Punct::LessThanOrEqual => Self::LessThanOrEqual,
            Punct::GreaterThanOrEqual => Self::GreaterThanOrEqual,
            Punct::Equal => Self::Equal,
            Punct::NotEqual => Self::NotEqual,
            Punct::Plus => Self::Add,
            Punct::Minus => Self::Sub,
            Punct::Asterisk => Self::Mul,
            Punct::Slash => Self::Div,
            Punct::Percent => Self::Mod,
            _ => return None,
        };
        Some(op)
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::BitOr => "|",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Binding strength; higher binds tighter.
    ///
    /// - 1: `or` `|`
    /// - 2: `and` `&`
    /// - 3: `<` `>` `<=` `>=` `==` `!=`
    /// - 7: `<<` `>>` `>>>`
    /// - 9: `+` `-`
    /// - 10: `*` `%` `/`
    /// - 12: `^` (right-associative)
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or | Self::BitOr => 1,
            Self::And | Self::BitAnd => 2,
            Self::LessThan
            | Self::GreaterThan
            | Self::LessThanOrEqual
            | Self::GreaterThanOrEqual
            | Self::Equal
            | Self::NotEqual => 3,
            Self::LeftShift | Self::RightShift | Self::UnsignedRightShift => 7,
            Self::Add | Self::Sub => 9,
            Self::Mul | Self::Mod | Self::Div => 10,
            Self::BitXor => 12,
        }
    }

    #[inline]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::BitXor)
    }

    /// `and`/`or` short-circuit and are lowered separately.
    #[inline]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOperator {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `not x`
    Not,
    /// `new x`
    New,
}

impl UnaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Punct(Punct::Minus) => Some(Self::Neg),
            TokenKind::Punct(Punct::Plus) => Some(Self::Plus),
            TokenKind::Keyword(Keyword::Not) => Some(Self::Not),
            TokenKind::Keyword(Keyword::New) => Some(Self::New),
            _ => None,
        }
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "not",
            Self::New => "new",
        }
    }
}
