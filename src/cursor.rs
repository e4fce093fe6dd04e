// cursor.rs - Rewindable position over the pattern text.
//
// Positions are byte offsets into the pattern, but callers treat them as
// opaque: they are only compared, stored and handed back to `rewind_to`.

use crate::unicode::Rune;

/// A position in the pattern, as returned by [`Cursor::pos`].
pub type Pos = usize;

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: Pos,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Cursor { text, pos: 0 }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn rewind_to(&mut self, pos: Pos) {
        debug_assert!(self.text.is_char_boundary(pos));
        self.pos = pos;
    }

    #[inline]
    pub fn more(&self) -> bool {
        self.pos < self.text.len()
    }

    /// The character at the cursor. Precondition: `more()`.
    #[inline]
    pub fn peek(&self) -> Rune {
        self.peek_char() as Rune
    }

    /// Returns `peek()` and steps over the whole (possibly multi-byte) character.
    #[inline]
    pub fn pop(&mut self) -> Rune {
        self.pop_char() as Rune
    }

    /// `peek()` as a `char`, for matching against syntax characters.
    pub fn peek_char(&self) -> char {
        match self.rest().chars().next() {
            Some(c) => c,
            None => panic!("Cursor::peek at end of pattern"),
        }
    }

    pub fn pop_char(&mut self) -> char {
        let c = self.peek_char();
        self.pos += c.len_utf8();
        c
    }

    /// Advances over `n` bytes that the caller has just checked are ASCII.
    #[inline]
    pub fn skip_ascii(&mut self, n: usize) {
        debug_assert!(self.rest().as_bytes()[..n].is_ascii());
        self.pos += n;
    }

    /// Advances over `s`, which `looking_at(s)` has just confirmed.
    #[inline]
    pub fn skip_literal(&mut self, s: &str) {
        debug_assert!(self.looking_at(s));
        self.pos += s.len();
    }

    #[inline]
    pub fn looking_at(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    #[inline]
    pub fn looking_at_char(&self, c: char) -> bool {
        self.rest().starts_with(c)
    }

    /// The unconsumed text.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// The text consumed since `start`.
    #[inline]
    pub fn from(&self, start: Pos) -> &'a str {
        &self.text[start..self.pos]
    }

    /// The whole pattern.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }
}

// ============================================================================
// Tests
// ============================================================================
