//! Ordered, append-only collection of leveled messages.

use std::fmt::{self, Write as _};
use std::io;

use crate::Error;

/// Longest message text kept, in UTF-8 code units. Longer text is
/// cut at the last character boundary that fits.
pub const MESSAGE_MAX_LENGTH: usize = 511;

const INITIAL_CAPACITY: usize = 8;

/// Format `args` into a string of at most [`MESSAGE_MAX_LENGTH`] bytes.
#[must_use]
pub fn bounded(args: fmt::Arguments<'_>) -> String {
    let mut out = Bounded::default();
    // Bounded never reports an error of its own.
    let _ = out.write_fmt(args);
    out.buf
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// character.
#[must_use]
pub fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[derive(Default)]
struct Bounded {
    buf: String,
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MESSAGE_MAX_LENGTH - self.buf.len();
        self.buf.push_str(clip(s, room));
        Ok(())
    }
}

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => write!(f, "NOTE"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.text)
    }
}

/// Destination for diagnostics produced by a recognition pass.
pub trait Sink {
    /// Record one message.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the message cannot be stored.
    fn append(&mut self, level: Level, message: fmt::Arguments<'_>) -> Result<(), Error>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn append(&mut self, level: Level, message: fmt::Arguments<'_>) -> Result<(), Error> {
        (**self).append(level, message)
    }
}

/// Messages in arrival order. Entries are never removed, merged, or
/// reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<Message>,
}

impl Diagnostics {
    /// Create an empty collection with room for a few messages.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the initial allocation fails.
    pub fn new() -> Result<Self, Error> {
        Self::try_with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty collection with room for at least `capacity`
    /// messages. Capacity is rounded up to a power of two, minimum 8.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let capacity = capacity
            .max(INITIAL_CAPACITY)
            .checked_next_power_of_two()
            .unwrap_or(capacity);
        let mut messages = Vec::new();
        messages.try_reserve_exact(capacity)?;
        Ok(Self { messages })
    }

    pub fn note(&mut self, message: fmt::Arguments<'_>) -> Result<(), Error> {
        self.append(Level::Note, message)
    }

    pub fn warning(&mut self, message: fmt::Arguments<'_>) -> Result<(), Error> {
        self.append(Level::Warning, message)
    }

    pub fn error(&mut self, message: fmt::Arguments<'_>) -> Result<(), Error> {
        self.append(Level::Error, message)
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Write every message as `LEVEL: text`, one per line.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn render<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for message in &self.messages {
            writeln!(out, "{message}")?;
        }
        Ok(())
    }

    /// Print every message to standard output.
    pub fn print(&self) {
        print!("{self}");
    }

    fn push(&mut self, message: Message) -> Result<(), Error> {
        if self.messages.len() == self.messages.capacity() {
            let additional = self.messages.capacity().max(INITIAL_CAPACITY);
            self.messages.try_reserve_exact(additional)?;
        }
        self.messages.push(message);
        Ok(())
    }
}

impl Sink for Diagnostics {
    fn append(&mut self, level: Level, message: fmt::Arguments<'_>) -> Result<(), Error> {
        self.push(Message {
            level,
            text: bounded(message),
        })
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
