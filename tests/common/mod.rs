#![allow(dead_code)]

use glim::{Level, TokenKind, recognize, tokenize};

/// Assert that `input` is accepted with exactly one "syntax is ok" note.
pub fn assert_accepts(input: &str) {
    let diagnostics =
        recognize(input).unwrap_or_else(|e| panic!("expected {input:?} to parse, got: {e}"));
    assert_eq!(diagnostics.len(), 1, "diagnostics for {input:?}");
    let message = &diagnostics.messages()[0];
    assert_eq!(message.level, Level::Note);
    assert_eq!(message.text, "syntax is ok");
}

/// Assert that `input` is rejected with exactly `expected` as message.
pub fn assert_rejects(input: &str, expected: &str) {
    match recognize(input) {
        Ok(_) => panic!("expected {input:?} to fail with {expected:?}"),
        Err(e) => assert_eq!(e.message(), expected, "input: {input:?}"),
    }
}

/// Token kinds of `input`, excluding the trailing EOF.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    let mut tokens = tokenize(input).expect("tokenize failed");
    let eof = tokens.pop().expect("missing eof");
    assert_eq!(eof.kind, TokenKind::Eof);
    tokens.into_iter().map(|t| t.kind).collect()
}
