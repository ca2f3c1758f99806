use std::fmt;

use crate::Error;
use crate::diagnostics::{MESSAGE_MAX_LENGTH, clip};
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that no grammar rule accepts at this point.
    UnexpectedToken { found: String },
    /// Input ended in the middle of a construct.
    UnexpectedEof,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found } => write!(f, "unexpected token '{found}'"),
            Self::UnexpectedEof => write!(f, "unexpected end of file"),
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} [{}:{}]", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    /// Error for a token the grammar does not accept here.
    ///
    /// The token text is clipped so the rendered message, position
    /// included, stays within [`MESSAGE_MAX_LENGTH`].
    #[must_use]
    pub fn unexpected(token: &Token<'_>) -> Self {
        let kind = if token.is(TokenKind::Eof) {
            ParseErrorKind::UnexpectedEof
        } else {
            // "unexpected token '' [" + "line:col" + "]"
            let overhead = "unexpected token '' [".len() + token.span.to_string().len() + 1;
            ParseErrorKind::UnexpectedToken {
                found: clip(token.text, MESSAGE_MAX_LENGTH.saturating_sub(overhead)).to_string(),
            }
        };
        Self {
            kind,
            span: token.span,
        }
    }
}

type Result<T = ()> = std::result::Result<T, Error>;

/// Recognize a complete program.
///
/// Succeeds when the whole input is a sequence of `let` bindings
/// followed by at most one expression.
///
/// # Errors
///
/// Returns the first lexical or syntactic error encountered.
pub fn parse(source: &str) -> Result {
    Parser::new(source)?.parse_program()
}

/// Recursive-descent recognizer over a single-token-lookahead lexer.
///
/// Each rule either consumes the construct it names or returns the
/// first error it hits; nothing is retried.
#[derive(Debug, Clone)]
pub struct Parser<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Parser<'src> {
    /// Build a recognizer over `source`, scanning its first token.
    ///
    /// # Errors
    ///
    /// Returns `Error::Lex` if the first token is malformed.
    pub fn new(source: &'src str) -> Result<Self> {
        Ok(Self::from_lexer(Lexer::new(source)?))
    }

    #[must_use]
    pub const fn from_lexer(lexer: Lexer<'src>) -> Self {
        Self { lexer }
    }

    /// `stmt := EOF | "let" NAME "=" expr ";" stmt | expr EOF`
    ///
    /// # Errors
    ///
    /// Returns the first lexical or syntactic error encountered.
    pub fn parse_program(&mut self) -> Result {
        loop {
            match self.current().kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Let => self.parse_let()?,
                _ => {
                    self.parse_expr()?;
                    return self.expect_eof();
                }
            }
        }
    }

    fn parse_let(&mut self) -> Result {
        self.bump()?;
        self.expect_name()?;
        self.expect(TokenKind::Equal)?;
        self.parse_expr()?;
        self.expect(TokenKind::Semicolon)
    }

    /// `expr := ternary ( "|>" ternary )*`
    ///
    /// # Errors
    ///
    /// Returns the first lexical or syntactic error encountered.
    pub fn parse_expr(&mut self) -> Result {
        self.binary(&[TokenKind::Pipe], Self::parse_ternary)
    }

    fn parse_ternary(&mut self) -> Result {
        self.parse_or()?;
        if self.eat(TokenKind::QuestionMark)? {
            self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            self.parse_expr()?;
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result {
        self.binary(&[TokenKind::PipePipe], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result {
        self.binary(&[TokenKind::AmpAmp], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result {
        self.binary(
            &[TokenKind::EqualEqual, TokenKind::BangEqual],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result {
        self.binary(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::parse_concat,
        )
    }

    fn parse_concat(&mut self) -> Result {
        self.binary(&[TokenKind::PlusPlus], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result {
        self.binary(
            &[TokenKind::Plus, TokenKind::Minus],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result {
        self.binary(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result {
        while matches!(self.current().kind, TokenKind::Bang | TokenKind::Minus) {
            self.bump()?;
        }
        self.parse_postfix()
    }

    /// Any number of `[index]` and `(args)` suffixes, in any order.
    fn parse_postfix(&mut self) -> Result {
        self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenKind::LeftBracket => {
                    self.bump()?;
                    self.parse_expr()?;
                    self.expect(TokenKind::RightBracket)?;
                }
                TokenKind::LeftParen => {
                    self.bump()?;
                    self.parse_list(TokenKind::RightParen)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_primary(&mut self) -> Result {
        match self.current().kind {
            TokenKind::Nil
            | TokenKind::False
            | TokenKind::True
            | TokenKind::Number
            | TokenKind::String => self.bump(),
            TokenKind::LeftBracket => {
                self.bump()?;
                self.parse_list(TokenKind::RightBracket)
            }
            TokenKind::Name => self.parse_name(),
            TokenKind::LeftParen => {
                self.bump()?;
                self.parse_expr()?;
                self.expect(TokenKind::RightParen)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// A name reference, `name => body`, or `a, b, ... => body`.
    ///
    /// A comma after the first name always commits to a lambda
    /// parameter list.
    fn parse_name(&mut self) -> Result {
        self.bump()?;
        if self.eat(TokenKind::FatArrow)? {
            return self.parse_expr();
        }
        if self.eat(TokenKind::Comma)? {
            self.expect_name()?;
            while self.eat(TokenKind::Comma)? {
                self.expect_name()?;
            }
            self.expect(TokenKind::FatArrow)?;
            return self.parse_expr();
        }
        Ok(())
    }

    /// Comma-separated expressions up to `close`. The opening
    /// delimiter has already been consumed; trailing commas are not
    /// allowed.
    fn parse_list(&mut self, close: TokenKind) -> Result {
        if self.eat(close)? {
            return Ok(());
        }
        self.parse_expr()?;
        while self.eat(TokenKind::Comma)? {
            self.parse_expr()?;
        }
        self.expect(close)
    }

    /// Left-associative chain of `operand` separated by any of `ops`.
    fn binary(&mut self, ops: &[TokenKind], operand: fn(&mut Self) -> Result) -> Result {
        operand(self)?;
        while ops.contains(&self.current().kind) {
            self.bump()?;
            operand(self)?;
        }
        Ok(())
    }

    const fn current(&self) -> &Token<'src> {
        self.lexer.current()
    }

    fn bump(&mut self) -> Result {
        self.lexer.advance().map_err(Error::from)
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if !self.current().is(kind) {
            return Ok(false);
        }
        self.bump()?;
        Ok(true)
    }

    fn expect(&mut self, kind: TokenKind) -> Result {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_name(&mut self) -> Result {
        self.expect(TokenKind::Name)
    }

    fn expect_eof(&self) -> Result {
        if self.current().is(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> Error {
        let err = ParseError::unexpected(self.current());
        tracing::debug!(error = %err, "syntax error");
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(input: &str) -> ParseError {
        match parse(input) {
            Err(Error::Parse(err)) => err,
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn empty_program() {
        assert!(parse("").is_ok());
        assert!(parse("   \n\t").is_ok());
    }

    #[test]
    fn let_bindings_then_expression() {
        assert!(parse("let a = 1; let b = a + 2; a * b").is_ok());
    }

    #[test]
    fn let_bindings_without_trailing_expression() {
        assert!(parse("let a = 1;").is_ok());
    }

    #[test]
    fn missing_let_value() {
        let err = parse_err("let x = ;");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: ";".to_string()
            }
        );
        assert_eq!(err.span, Span::new(1, 9));
    }

    #[test]
    fn missing_let_name() {
        let err = parse_err("let 1 = 2;");
        assert_eq!(err.span, Span::new(1, 5));
    }

    #[test]
    fn missing_semicolon() {
        let err = parse_err("let x = 1");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.span, Span::new(1, 10));
    }

    #[test]
    fn trailing_operator() {
        let err = parse_err("1 + ");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.span, Span::new(1, 5));
    }

    #[test]
    fn two_expressions_are_rejected() {
        let err = parse_err("1 2");
        assert_eq!(err.span, Span::new(1, 3));
    }

    #[test]
    fn precedence_chain() {
        assert!(parse("a |> b ? c || d && e == f < g ++ h + i * -!j[0](k) : l").is_ok());
    }

    #[test]
    fn nested_ternary() {
        assert!(parse("a ? b ? c : d : e ? f : g").is_ok());
    }

    #[test]
    fn ternary_requires_colon() {
        let err = parse_err("a ? b c");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: "c".to_string()
            }
        );
    }

    #[test]
    fn postfix_chain() {
        assert!(parse("f(x)[0](y)").is_ok());
        assert!(parse("m[1][2]()()").is_ok());
    }

    #[test]
    fn unary_stacking() {
        assert!(parse("!!x").is_ok());
        assert!(parse("--x").is_ok());
        assert!(parse("-!-1").is_ok());
    }

    #[test]
    fn lambdas() {
        assert!(parse("n => n + 1").is_ok());
        assert!(parse("a, b => a + b").is_ok());
        assert!(parse("a, b, c => a |> b |> c").is_ok());
        assert!(parse("map(xs, x => x * 2)").is_ok());
    }

    #[test]
    fn lone_name_is_a_reference() {
        assert!(parse("x").is_ok());
        assert!(parse("(x)").is_ok());
    }

    #[test]
    fn parameter_list_without_arrow() {
        let err = parse_err("a, b");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        let err = parse_err("a, 1 => 2");
        assert_eq!(err.span, Span::new(1, 4));
    }

    #[test]
    fn names_separated_by_commas_start_a_lambda() {
        let err = parse_err("f(a, b)");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: ")".to_string()
            }
        );
        assert_eq!(err.span, Span::new(1, 7));
    }

    #[test]
    fn arrays() {
        assert!(parse("[]").is_ok());
        assert!(parse("[1, \"two\", [nil], true ++ false]").is_ok());
    }

    #[test]
    fn trailing_comma_in_call() {
        let err = parse_err("f(1,)");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: ")".to_string()
            }
        );
        assert_eq!(err.span, Span::new(1, 5));
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_err("(1 + 2");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn long_token_text_is_clipped_to_fit() {
        let body = "é".repeat(600);
        let err = parse_err(&format!("1 \"{body}\""));
        let ParseErrorKind::UnexpectedToken { found } = &err.kind else {
            panic!("expected unexpected token, got {:?}", err.kind);
        };
        assert!(found.chars().all(|c| c == 'é'));
        assert_eq!(err.span, Span::new(1, 3));
        let rendered = err.to_string();
        assert!(rendered.len() <= MESSAGE_MAX_LENGTH);
        assert!(rendered.ends_with("' [1:3]"));
    }

    #[test]
    fn nested_parens_and_brackets() {
        let depth = 32;
        let src = format!("{}1{}", "([".repeat(depth), "])".repeat(depth));
        assert!(parse(&src).is_ok());
    }

    #[test]
    fn lex_error_propagates() {
        assert!(matches!(parse("1 + #"), Err(Error::Lex(_))));
    }

    #[test]
    fn lex_error_after_syntax_error_is_not_reached() {
        let err = parse_err("1 2 #");
        assert_eq!(err.span, Span::new(1, 3));
    }
}
