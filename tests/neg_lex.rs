//! Negative scanner tests that should fail (lex returns Err).

use tree_sitter_ghostlang::{language, lexer::scan};

fn lex_err(src: &str) -> bool {
    scan::lex(&language().lexer, src).is_err()
}

#[test]
fn unterminated_string_eof() {
    assert!(lex_err("s = \"hello"), "unterminated string should error");
}

#[test]
fn newline_in_string() {
    assert!(
        lex_err("s = \"hello\nworld\""),
        "newline in string should error"
    );
}

#[test]
fn unterminated_block_comment() {
    assert!(
        lex_err("a = 1 /* comment"),
        "unterminated block comment should error"
    );
}

#[test]
fn stray_byte() {
    assert!(lex_err("a = 1 @ 2"), "stray byte should error");
}

#[test]
fn lone_ampersand() {
    assert!(lex_err("a & b"), "single '&' should error");
}

#[test]
fn lone_pipe() {
    assert!(lex_err("a | b"), "single '|' should error");
}

#[test]
fn number_with_dangling_dot() {
    assert!(lex_err("x = 1. ;"), "digits + bare '.' should error");
}

#[test]
fn member_access_on_number_literal() {
    // '.' after digits commits to a float, so `1.x` never reaches the
    // parser; `(1).x` is the supported spelling.
    assert!(lex_err("var y = 1.x;"), "digits + '.' + ident should error");
}

#[test]
fn escaped_quote_stays_in_string() {
    let tokens = scan::lex(&language().lexer, r#"s = "a\"b";"#).unwrap();
    use tree_sitter_ghostlang::lexer::TokenKind;
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::String,
            TokenKind::Semicolon
        ]
    );
}
