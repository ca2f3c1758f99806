use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// No closing `"` before end of input.
    UnterminatedString,
    /// Character that starts no token. Non-printable characters are
    /// reported as `?`.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::UnexpectedCharacter(ch) => write!(f, "unexpected character '{ch}'"),
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} [{}:{}]", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a source string into a sequence of tokens.
///
/// The returned vector always ends with a single [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns `LexError` on unterminated strings or characters that
/// start no token.
#[tracing::instrument(skip_all, fields(source_len = input.len()))]
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = Vec::new();
    loop {
        let token = *lexer.current();
        tokens.push(token);
        if token.is(TokenKind::Eof) {
            return Ok(tokens);
        }
        lexer.advance()?;
    }
}

/// Operators and punctuation, longest spelling first within each
/// shared prefix.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    ("?", TokenKind::QuestionMark),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    ("=>", TokenKind::FatArrow),
    ("==", TokenKind::EqualEqual),
    ("=", TokenKind::Equal),
    ("|>", TokenKind::Pipe),
    ("||", TokenKind::PipePipe),
    ("&&", TokenKind::AmpAmp),
    ("!=", TokenKind::BangEqual),
    ("!", TokenKind::Bang),
    ("<=", TokenKind::LessEqual),
    ("<", TokenKind::Less),
    (">=", TokenKind::GreaterEqual),
    (">", TokenKind::Greater),
    ("++", TokenKind::PlusPlus),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
];

const fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

const fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Single-token-lookahead scanner over a source buffer.
///
/// Exactly one token is current at any time. [`Lexer::advance`]
/// discards it and scans the next one; once EOF is reached the lexer
/// keeps reporting EOF at the same position.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    col: usize,
    token: Token<'src>,
}

impl<'src> Lexer<'src> {
    /// Create a lexer and scan the first token.
    ///
    /// # Errors
    ///
    /// Returns `LexError` if the first token is malformed.
    pub fn new(source: &'src str) -> Result<Self, LexError> {
        let start = if source.starts_with('\u{FEFF}') { 3 } else { 0 };
        let mut lexer = Self {
            source,
            pos: start,
            line: 1,
            col: 1,
            token: Token::new(TokenKind::Eof, "", Span::new(1, 1)),
        };
        lexer.advance()?;
        Ok(lexer)
    }

    /// The token most recently scanned.
    #[must_use]
    pub const fn current(&self) -> &Token<'src> {
        &self.token
    }

    /// Position of the next character to scan.
    #[must_use]
    pub const fn position(&self) -> Span {
        Span::new(self.line, self.col)
    }

    /// Scan the next token, replacing the current one.
    ///
    /// # Errors
    ///
    /// Returns `LexError` if no token rule matches at the cursor. The
    /// lexer must not be advanced again after a failure.
    pub fn advance(&mut self) -> Result<(), LexError> {
        self.skip_space();

        let Some(first) = self.peek() else {
            self.token = Token::new(TokenKind::Eof, "", self.position());
            return Ok(());
        };

        if let Some(&(text, kind)) = PUNCTUATION
            .iter()
            .find(|(text, _)| self.rest().starts_with(*text))
        {
            self.emit(kind, self.pos, text.len());
            return Ok(());
        }

        if let Some(len) = self.number_len() {
            self.emit(TokenKind::Number, self.pos, len);
            return Ok(());
        }

        if first == b'"' {
            return self.read_string();
        }

        if is_ident_start(first) {
            let len = self.run_len(self.pos + 1, is_ident_continue) + 1;
            let text = &self.source[self.pos..self.pos + len];
            let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Name);
            self.emit(kind, self.pos, len);
            return Ok(());
        }

        Err(self.unexpected_character())
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Byte at the cursor. A NUL byte acts as the end-of-input sentinel.
    fn peek(&self) -> Option<u8> {
        self.byte_at(self.pos)
    }

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.source
            .as_bytes()
            .get(index)
            .copied()
            .filter(|&b| b != 0)
    }

    fn run_len(&self, from: usize, pred: fn(u8) -> bool) -> usize {
        let mut end = from;
        while self.byte_at(end).is_some_and(pred) {
            end += 1;
        }
        end - from
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.bump();
        }
    }

    fn bump(&mut self) {
        if self.source.as_bytes()[self.pos] == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
    }

    /// Make the `len` bytes at `start` the current token and move the
    /// cursor past everything consumed so far plus those bytes.
    fn emit(&mut self, kind: TokenKind, start: usize, len: usize) {
        let span = self.position();
        self.token = Token::new(kind, &self.source[start..start + len], span);
        let end = start + len;
        while self.pos < end {
            self.bump();
        }
    }

    /// Length of the number literal at the cursor, or `None` if the
    /// text there is not a well-formed number.
    ///
    /// A lone `0` completes the integer part, so `01` is rejected by
    /// the trailing identifier-character check.
    fn number_len(&self) -> Option<usize> {
        let start = self.pos;
        let mut end = start;
        match self.byte_at(end)? {
            b'0' => end += 1,
            b'1'..=b'9' => end += 1 + self.run_len(end + 1, |b| b.is_ascii_digit()),
            _ => return None,
        }

        if self.byte_at(end) == Some(b'.') {
            if !self.byte_at(end + 1).is_some_and(|b| b.is_ascii_digit()) {
                return Some(end - start);
            }
            end += 1 + self.run_len(end + 1, |b| b.is_ascii_digit());
        }

        if matches!(self.byte_at(end), Some(b'e' | b'E')) {
            end += 1;
            if matches!(self.byte_at(end), Some(b'+' | b'-')) {
                end += 1;
            }
            let digits = self.run_len(end, |b| b.is_ascii_digit());
            if digits == 0 {
                return None;
            }
            end += digits;
        }

        if self.byte_at(end).is_some_and(is_ident_continue) {
            return None;
        }
        Some(end - start)
    }

    fn read_string(&mut self) -> Result<(), LexError> {
        let body = self.pos + 1;
        let len = self.run_len(body, |b| b != b'"');
        if self.byte_at(body + len).is_none() {
            return Err(LexError {
                kind: LexErrorKind::UnterminatedString,
                span: self.position(),
            });
        }
        self.emit(TokenKind::String, body, len);
        // closing quote
        self.bump();
        Ok(())
    }

    fn unexpected_character(&self) -> LexError {
        let ch = self
            .rest()
            .chars()
            .next()
            .filter(char::is_ascii_graphic)
            .unwrap_or('?');
        LexError {
            kind: LexErrorKind::UnexpectedCharacter(ch),
            span: self.position(),
        }
    }
}
