//! Character cursor over an abbreviation string
//!
//! Positions are byte offsets into the source. Every reader in this crate
//! moves a single `Cursor`, so offsets reported in errors are always
//! absolute offsets into the whole abbreviation.

use crate::error::{ParseError, ParseErrorKind};

/// Something a single character can be tested against
pub trait CharPattern {
    fn matches(&self, ch: char) -> bool;
}

impl CharPattern for char {
    fn matches(&self, ch: char) -> bool {
        *self == ch
    }
}

impl<F: Fn(char) -> bool> CharPattern for F {
    fn matches(&self, ch: char) -> bool {
        self(ch)
    }
}

#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    start: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Current character without advancing
    pub fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Consume and return the current character; no-op at end
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume one character if it matches
    pub fn eat(&mut self, pattern: impl CharPattern) -> bool {
        match self.peek() {
            Some(ch) if pattern.matches(ch) => {
                self.pos += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consume a maximal run of matching characters. Returns `true` if
    /// anything was consumed. Does not touch the token start.
    pub fn eat_while(&mut self, pattern: impl CharPattern) -> bool {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pattern.matches(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos > start
    }

    /// Start a new token at the current position, consume a maximal run of
    /// matching characters and return it (possibly empty).
    pub fn consume_while(&mut self, pattern: impl CharPattern) -> &'src str {
        self.start = self.pos;
        self.eat_while(pattern);
        self.current_token()
    }

    /// Rewind by `n` characters.
    ///
    /// Callers must not rewind past the start of the current token.
    pub fn backtrack(&mut self, n: usize) {
        for _ in 0..n {
            match self.source[..self.pos].chars().next_back() {
                Some(ch) => self.pos -= ch.len_utf8(),
                None => break,
            }
        }
    }

    /// Text between the last token start and the current position
    pub fn current_token(&self) -> &'src str {
        &self.source[self.start..self.pos]
    }

    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }

    /// With the cursor right after an opening `quote`, skip to just past the
    /// matching closing quote. A backslash protects the next character.
    /// Returns `false`, leaving the position untouched, if the literal is
    /// never closed.
    pub fn skip_quoted(&mut self, quote: char) -> bool {
        let mut chars = self.source[self.pos..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                chars.next();
            } else if ch == quote {
                self.pos += offset + ch.len_utf8();
                return true;
            }
        }
        false
    }

    /// Error at the current position
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.pos)
    }

    pub fn error_at(&self, kind: ParseErrorKind, pos: usize) -> ParseError {
        ParseError::new(kind, pos, self.source)
    }
}
