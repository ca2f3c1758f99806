//! Lexer and syntax recognizer for the Glim expression language.
//!
//! Glim programs are a sequence of `let` bindings followed by a
//! single expression. This crate checks that source text conforms
//! to the grammar and reports the first error with its line and
//! column. It builds no syntax tree.
//!
//! # Quick start
//!
//! ```
//! let source = "let fib = n => n <= 1 ? n : fib(n - 1) + fib(n - 2);\nfib(10)";
//! let diagnostics = glim::recognize(source).unwrap();
//! assert_eq!(diagnostics.to_string(), "NOTE: syntax is ok\n");
//!
//! let err = glim::recognize("let x = ;").unwrap_err();
//! assert_eq!(err.to_string(), "unexpected token ';' [1:9]");
//! ```
//!
//! ## Reporting into your own sink
//!
//! ```
//! use glim::{Diagnostics, Level};
//!
//! let mut diagnostics = Diagnostics::new().unwrap();
//! glim::recognize_into("[1, 2, 3]", &mut diagnostics).unwrap();
//! glim::recognize_into("a, b => a + b", &mut diagnostics).unwrap();
//! assert_eq!(diagnostics.len(), 2);
//! assert!(diagnostics.iter().all(|m| m.level == Level::Note));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::collections::TryReserveError;

pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token;

pub use diagnostics::{Diagnostics, Level, MESSAGE_MAX_LENGTH, Message, Sink, bounded, clip};
pub use lexer::{LexError, LexErrorKind, Lexer, tokenize};
pub use parser::{ParseError, ParseErrorKind, Parser, parse};
pub use token::{Span, Token, TokenKind};

/// Unified error type covering lexing, parsing, and allocation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// Diagnostics storage could not grow.
    #[error("out of memory")]
    OutOfMemory(#[from] TryReserveError),
}

impl Error {
    /// Where the error was detected, if it has a source position.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::Lex(e) => Some(e.span),
            Self::Parse(e) => Some(e.span),
            Self::OutOfMemory(_) => None,
        }
    }

    /// The rendered message, truncated to [`MESSAGE_MAX_LENGTH`].
    #[must_use]
    pub fn message(&self) -> String {
        bounded(format_args!("{self}"))
    }
}

/// Recognize `source` and report the outcome into `sink`.
///
/// On success a single `NOTE: syntax is ok` is appended. On failure
/// nothing is appended and the first error is returned.
///
/// Recognition recurses once per nesting level of parentheses,
/// brackets, calls, ternaries and lambda bodies, with no depth limit.
/// Input nested a few thousand levels deep can exhaust a 2 MiB thread
/// stack; run such input on a thread with a larger stack.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn recognize_into<S: Sink + ?Sized>(source: &str, sink: &mut S) -> Result<(), Error> {
    if let Err(err) = parse(source) {
        tracing::debug!(error = %err, "recognition failed");
        return Err(err);
    }
    tracing::debug!("recognition succeeded");
    sink.append(Level::Note, format_args!("syntax is ok"))
}

/// Recognize `source` into a fresh [`Diagnostics`].
pub fn recognize(source: &str) -> Result<Diagnostics, Error> {
    let mut diagnostics = Diagnostics::new()?;
    recognize_into(source, &mut diagnostics)?;
    Ok(diagnostics)
}
