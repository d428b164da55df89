use purr_common::message::Span;

use super::{lex_tokens, Token};

fn check(src: &str, expected: Vec<Token>) {
    let (tokens, msgs) = lex_tokens(src, 0);
    let tokens: Vec<_> = tokens.into_iter().map(|(tok, _)| tok).collect();
    assert!(msgs.is_empty(), "unexpected messages {msgs:?}");
    assert_eq!(expected, tokens);
}

fn name(text: &str) -> Token {
    Token::Name(text.into())
}

fn var(text: &str) -> Token {
    Token::Var(text.into())
}

#[test]
fn lex_definition() {
    check(
        "define twice : ('A ('A -> 'A) -> 'A) { dup [eval] dip eval }",
        vec![
            Token::Define,
            name("twice"),
            Token::Colon,
            Token::ParenOpen,
            var("A"),
            Token::ParenOpen,
            var("A"),
            Token::Arrow,
            var("A"),
            Token::ParenClose,
            Token::Arrow,
            var("A"),
            Token::ParenClose,
            Token::BraceOpen,
            name("dup"),
            Token::BracketOpen,
            name("eval"),
            Token::BracketClose,
            name("dip"),
            name("eval"),
            Token::BraceClose,
        ],
    );
}

#[test]
fn lex_literals() {
    check(
        r#"42 -7 1.5 "hi\n" 'c' '\''"#,
        vec![
            Token::Int(42),
            Token::Int(-7),
            Token::Float(1.5),
            Token::Str("hi\n".into()),
            Token::Char('c'),
            Token::Char('\''),
        ],
    );
}

#[test]
fn lex_operators() {
    check(
        "+ - <= == ~> -> = :",
        vec![
            name("+"),
            name("-"),
            name("<="),
            name("=="),
            Token::EffectArrow,
            Token::Arrow,
            Token::Equal,
            Token::Colon,
        ],
    );
}

#[test]
fn lex_skips_comments() {
    check(
        "dup // a comment\n/* a\nlonger * one */ pop",
        vec![name("dup"), name("pop")],
    );
}

#[test]
fn lex_keywords_are_not_names() {
    check("define defined", vec![Token::Define, name("defined")]);
}

#[test]
fn lex_invalid_characters() {
    let (tokens, msgs) = lex_tokens("dup ## pop", 0);

    assert_eq!(1, msgs.len());
    assert_eq!(
        vec![
            (name("dup"), Span::new(0, 0, 3)),
            (Token::Invalid, Span::new(0, 4, 6)),
            (name("pop"), Span::new(0, 7, 10)),
        ],
        tokens
    );
}
