use std::fmt;

/// Source location for error reporting. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `?`
    QuestionMark,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `=>`
    FatArrow,
    /// `==`
    EqualEqual,
    /// `=`
    Equal,
    /// `|>`
    Pipe,
    /// `||`
    PipePipe,
    /// `&&`
    AmpAmp,
    /// `!=`
    BangEqual,
    /// `!`
    Bang,
    /// `<=`
    LessEqual,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `>`
    Greater,
    /// `++`
    PlusPlus,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// Number literal such as `0`, `42`, `1.5e-3`.
    Number,
    /// Double-quoted string literal. The token text excludes the quotes.
    String,
    /// `false`
    False,
    /// `let`
    Let,
    /// `nil`
    Nil,
    /// `true`
    True,
    /// Identifier.
    Name,
}

impl TokenKind {
    /// Look up the keyword spelled by `text`, if any.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        match text {
            "false" => Some(Self::False),
            "let" => Some(Self::Let),
            "nil" => Some(Self::Nil),
            "true" => Some(Self::True),
            _ => None,
        }
    }

    /// Short human-readable name, used when dumping token streams.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eof => "eof",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Semicolon => "semicolon",
            Self::QuestionMark => "question-mark",
            Self::LeftParen => "left-paren",
            Self::RightParen => "right-paren",
            Self::LeftBracket => "left-bracket",
            Self::RightBracket => "right-bracket",
            Self::FatArrow => "fat-arrow",
            Self::EqualEqual => "equal-equal",
            Self::Equal => "equal",
            Self::Pipe => "pipe",
            Self::PipePipe => "pipe-pipe",
            Self::AmpAmp => "amp-amp",
            Self::BangEqual => "bang-equal",
            Self::Bang => "bang",
            Self::LessEqual => "less-equal",
            Self::Less => "less",
            Self::GreaterEqual => "greater-equal",
            Self::Greater => "greater",
            Self::PlusPlus => "plus-plus",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Star => "star",
            Self::Slash => "slash",
            Self::Percent => "percent",
            Self::Number => "number",
            Self::String => "string",
            Self::False => "false",
            Self::Let => "let",
            Self::Nil => "nil",
            Self::True => "true",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, text, and source location.
///
/// The text borrows from the source buffer. For strings it is the
/// contents between the quotes; for EOF it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
