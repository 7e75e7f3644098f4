//! Bounds-checked position cursor shared by the block and inline parsers.

use crate::ParseError;

/// A cursor for character-by-character parsing over a string slice.
///
/// Positions are byte offsets into the slice. Every read is bounds-checked:
/// running off the end yields `None` (or [`ParseError::UnexpectedEnd`] through
/// [`Cursor::expect`]) instead of a panic.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns the current byte position.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// Returns true if at end of input.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Returns the unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Returns the input between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.s.get(start..self.i).unwrap_or("")
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Checks if the remaining input starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Returns true if the cursor sits right after a newline.
    pub fn at_line_start(&self) -> bool {
        self.s.get(..self.i).is_some_and(|s| s.ends_with('\n'))
    }

    /// Advances by one character, returning the consumed character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes, stopping at end of input.
    ///
    /// Only used to skip ASCII markers that were just matched with
    /// [`Cursor::starts_with`], so the new position is a char boundary.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Consumes one character, failing if the input is exhausted.
    pub fn expect(&mut self, construct: &'static str) -> Result<char, ParseError> {
        self.bump().ok_or(ParseError::UnexpectedEnd {
            construct,
            offset: self.i,
        })
    }

    /// Moves to an absolute position previously obtained from this cursor.
    pub fn seek(&mut self, pos: usize) {
        self.i = pos.min(self.s.len());
    }

    /// Advances while `pred` holds for the current character.
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    /// Advances up to (not past) the next newline or end of input.
    pub fn skip_to_line_end(&mut self) {
        self.skip_while(|c| c != '\n');
    }
}
