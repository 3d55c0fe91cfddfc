use super::*;
use pretty_assertions::assert_eq;

fn tokens(source: &str) -> Vec<Token> {
    match lex(source, LexerOptions::default()) {
        Ok(output) => output.tokens,
        Err(err) => panic!("unexpected lex error: {err}"),
    }
}

fn kinds(source: &str) -> Vec<TokenKind> {
    tokens(source).into_iter().map(|token| token.kind).collect()
}

fn values(source: &str) -> Vec<String> {
    tokens(source).into_iter().map(|token| token.value).collect()
}

#[test]
fn call_statement() {
    let tokens = tokens(r#"print("hello")"#);
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Identifier,
            TokenKind::Punct(Punct::LeftParen),
            TokenKind::StringLiteral,
            TokenKind::Punct(Punct::RightParen),
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].start, Position::new(1, 1));
    assert_eq!(tokens[0].end, Position::new(1, 6));
    assert_eq!(tokens[2].value, "hello");
    assert_eq!(tokens[2].span, Span::new(6, 13));
    assert_eq!(tokens[4].value, "<eof>");
}

#[test]
fn doubled_quote_unescapes() {
    assert_eq!(values(r#""a""b""#), vec![r#"a"b"#, "<eof>"]);
    assert_eq!(values(r#""""""#), vec![r#"""#, "<eof>"]);
}

#[test]
fn compound_keywords() {
    assert_eq!(
        kinds("end if end while end for end function end other"),
        vec![
            TokenKind::Keyword(Keyword::EndIf),
            TokenKind::Keyword(Keyword::EndWhile),
            TokenKind::Keyword(Keyword::EndFor),
            TokenKind::Keyword(Keyword::EndFunction),
            TokenKind::Keyword(Keyword::End),
            TokenKind::Eof,
        ]
    );
    assert_eq!(values("else if x"), vec!["else if", "x", "<eof>"]);
    assert_eq!(values("else iffy"), vec!["else", "iffy", "<eof>"]);
}

#[test]
fn literal_words() {
    assert_eq!(
        kinds("true false null nothing"),
        vec![
            TokenKind::BooleanLiteral,
            TokenKind::BooleanLiteral,
            TokenKind::NilLiteral,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn longest_match_punctuators() {
    assert_eq!(
        values("a >>> b >> c >= d << e <= f != g == h = i"),
        vec![
            "a", ">>>", "b", ">>", "c", ">=", "d", "<<", "e", "<=", "f", "!=", "g", "==", "h",
            "=", "i", "<eof>"
        ]
    );
    assert_eq!(
        values("+= -= *= /= ^ % : , { } [ ] ( ) & |"),
        vec![
            "+=", "-=", "*=", "/=", "^", "%", ":", ",", "{", "}", "[", "]", "(", ")", "&", "|",
            "<eof>"
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(values("1 2.5 .5 1e10 3.25E-2"), vec!["1", "2.5", ".5", "1e10", "3.25E-2", "<eof>"]);
    assert_eq!(kinds("a.b")[1], TokenKind::Punct(Punct::Dot));
}

#[test]
fn line_breaks_are_single_eol_tokens() {
    for source in ["a\nb", "a\r\nb", "a\n\rb", "a\rb"] {
        let tokens = tokens(source);
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Identifier,
                TokenKind::Eol,
                TokenKind::Identifier,
                TokenKind::Eof
            ],
            "source {source:?}"
        );
        assert_eq!(tokens[1].value, ";");
        assert_eq!(tokens[2].start, Position::new(2, 1));
    }
}

#[test]
fn semicolon_is_eol() {
    assert_eq!(
        kinds("a; b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Eol,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn comments_run_to_end_of_line() {
    assert_eq!(values("a // comment\nb"), vec!["a", ";", "b", "<eof>"]);
    assert_eq!(values("// only a comment"), vec!["<eof>"]);
}

#[test]
fn tab_width_shifts_columns() {
    let options = LexerOptions {
        force: false,
        tab_width: 4,
    };
    let output = lex("\tx", options).unwrap_or_default();
    assert_eq!(output.tokens[0].start, Position::new(1, 5));

    let output = lex("\tx", LexerOptions::default()).unwrap_or_default();
    assert_eq!(output.tokens[0].start, Position::new(1, 2));
}

#[test]
fn multiline_string_tracks_last_line() {
    let tokens = tokens("\"a\nb\" c");
    assert_eq!(tokens[0].value, "a\nb");
    assert_eq!(tokens[0].start, Position::new(1, 1));
    assert_eq!(tokens[0].end.line, 2);
    assert_eq!(tokens[1].start, Position::new(2, 4));
}

#[test]
fn strict_mode_stops_at_invalid_character() {
    let err = lex("a ! b", LexerOptions::default()).err();
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("Invalid character ! at line 1.".to_string())
    );
}

#[test]
fn strict_mode_unterminated_string() {
    let err = lex("x = \"abc", LexerOptions::default()).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(LexErrorKind::UnexpectedStringEol)
    );
}

#[test]
fn force_mode_skips_rest_of_line() {
    let options = LexerOptions {
        force: true,
        tab_width: 1,
    };
    let output = match lex("a ! b\nc", options) {
        Ok(output) => output,
        Err(err) => panic!("force mode should not fail: {err}"),
    };
    assert_eq!(
        output.tokens.iter().map(|t| t.value.as_str()).collect::<Vec<_>>(),
        vec!["a", ";", "c", "<eof>"]
    );
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].line, 1);
}

#[test]
fn eof_repeats() {
    let mut lexer = Lexer::new("", LexerOptions::default());
    assert!(matches!(lexer.next_token(), Ok(t) if t.is_eof()));
    assert!(matches!(lexer.next_token(), Ok(t) if t.is_eof()));
}

#[test]
fn iterator_stops_after_eof() {
    let lexer = Lexer::new("a b", LexerOptions::default());
    assert_eq!(lexer.count(), 3);
}

mod properties {
    use super::super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn numeric_literal_is_one_token(
            text in "[0-9]{1,8}(\\.[0-9]{1,6})?([eE][+-]?[0-9]{1,3})?"
        ) {
            let output = lex(&text, LexerOptions::default());
            prop_assert!(output.is_ok());
            let tokens = output.map(|o| o.tokens).unwrap_or_default();
            prop_assert_eq!(tokens.len(), 2);
            prop_assert_eq!(tokens[0].kind, TokenKind::NumericLiteral);
            prop_assert_eq!(&tokens[0].value, &text);
            prop_assert_eq!(tokens[0].span, Span::new(0, text.chars().count() as u32));
            prop_assert!(tokens[1].is_eof());
        }

        #[test]
        fn doubled_quotes_unescape(parts in proptest::collection::vec("[a-z ]{0,8}", 1..4)) {
            let source = format!("\"{}\"", parts.join("\"\""));
            let output = lex(&source, LexerOptions::default());
            let tokens = output.map(|o| o.tokens).unwrap_or_default();
            prop_assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
            prop_assert_eq!(&tokens[0].value, &parts.join("\""));
        }
    }
}
