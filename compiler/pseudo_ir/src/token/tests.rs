use super::*;
use pretty_assertions::assert_eq;

#[test]
fn compound_terminators_classify() {
    assert_eq!(Keyword::from_text("end if"), Some(Keyword::EndIf));
    assert_eq!(Keyword::from_text("end function"), Some(Keyword::EndFunction));
    assert_eq!(Keyword::from_text("end banana"), Some(Keyword::End));
    assert_eq!(Keyword::from_text("else if"), Some(Keyword::ElseIf));
    assert_eq!(Keyword::from_text("banana"), None);
}

#[test]
fn block_closers() {
    assert!(Keyword::Else.closes_block());
    assert!(Keyword::End.closes_block());
    assert!(!Keyword::If.closes_block());
    assert!(!Keyword::Then.closes_block());
}

#[test]
fn compound_assignment_operators() {
    assert_eq!(Punct::PlusAssign.compound_operator(), Some(Punct::Plus));
    assert_eq!(Punct::SlashAssign.compound_operator(), Some(Punct::Slash));
    assert_eq!(Punct::Assign.compound_operator(), None);
    assert_eq!(Punct::UnsignedRightShift.width(), 3);
}

#[test]
fn terminator_tokens() {
    let eol = Token::new(TokenKind::Eol, ";", Span::new(0, 1), Position::new(1, 1), Position::new(1, 2));
    assert!(eol.is_terminator());
    assert!(!eol.is_literal());
    let nil = Token::new(TokenKind::NilLiteral, "null", Span::new(0, 4), Position::new(1, 1), Position::new(1, 5));
    assert!(nil.is_literal());
    assert!(!nil.is_non_nil_literal());
}
