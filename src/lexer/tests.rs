//! Unit tests for the lexer module.

use super::lexer::tokenize;
use super::tokens::TokenKind;

fn kinds(input: &str) -> Vec<TokenKind> {
    let (tokens, errors) = tokenize(input.to_string(), None);
    assert!(errors.is_empty(), "unexpected lexer errors: {:?}", errors.len());
    tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_let_statement() {
    assert_eq!(
        kinds("let a := 5;"),
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Define,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("== != <= >= && || ++ -- :: := = ! < > + - / * ? ."),
        vec![
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::DoubleColon,
            TokenKind::Define,
            TokenKind::Assignment,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Slash,
            TokenKind::Star,
            TokenKind::Question,
            TokenKind::Dot,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("fn return let const true false null void if else for while type iface"),
        vec![
            TokenKind::Fn,
            TokenKind::Return,
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Void,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::While,
            TokenKind::TypeDef,
            TokenKind::Iface,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_number_literals() {
    let (tokens, errors) = tokenize("42 3.14".to_string(), None);
    assert!(errors.is_empty());

    assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
    assert_eq!(tokens[0].literal, "42");
    assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
    assert_eq!(tokens[1].literal, "3.14");
}

#[test]
fn test_tokenize_string_escapes() {
    let (tokens, errors) = tokenize("\"a\\nb\\t\\\"c\\\"\"".to_string(), None);
    assert!(errors.is_empty());

    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].literal, "a\nb\t\"c\"");
}

#[test]
fn test_tokenize_unclosed_string() {
    let (tokens, errors) = tokenize("\"abc".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Unclosed string literal");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
}

#[test]
fn test_tokenize_skips_comments() {
    assert_eq!(
        kinds("1 // line comment\n/* block\ncomment */ 2"),
        vec![TokenKind::IntLiteral, TokenKind::IntLiteral, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_positions() {
    let (tokens, _) = tokenize("let a := 5;\na + 1;".to_string(), None);

    assert_eq!((tokens[0].line, tokens[0].col), (1, 1)); // let
    assert_eq!((tokens[1].line, tokens[1].col), (1, 5)); // a
    assert_eq!((tokens[2].line, tokens[2].col), (1, 7)); // :=
    assert_eq!((tokens[3].line, tokens[3].col), (1, 10)); // 5
    assert_eq!((tokens[5].line, tokens[5].col), (2, 1)); // a
}

#[test]
fn test_tokenize_illegal_run_reported_once() {
    let (tokens, errors) = tokenize("let §§ x".to_string(), None);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Illegal token");
    assert!(tokens.iter().filter(|token| token.kind == TokenKind::Illegal).count() >= 2);
}

#[test]
fn test_tokenize_member_access_on_int() {
    assert_eq!(
        kinds("5.toString()"),
        vec![
            TokenKind::IntLiteral,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}
