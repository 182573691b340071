//! Byte cursor over the source text.
//!
//! The cursor advances byte-by-byte and reports `0x00` past the end of the
//! source, so scanning loops terminate naturally without explicit bounds
//! checks at every step. Action Code sources are ordinary strings; an
//! interior NUL is vanishingly unlikely and would simply lex as a
//! one-character fallback token.

/// Forward-only byte cursor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor {
            buf: source.as_bytes(),
            pos: 0,
        }
    }

    /// Byte at the current position, or `0x00` at EOF.
    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.buf.get(self.pos as usize).copied().unwrap_or(0)
    }

    /// Byte one position ahead, or `0x00` past EOF.
    #[inline]
    pub(crate) fn peek(&self) -> u8 {
        self.buf.get(self.pos as usize + 1).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos as usize >= self.buf.len()
    }

    #[inline]
    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    /// Byte at an arbitrary position, or `0x00` out of range.
    #[inline]
    pub(crate) fn byte_at(&self, pos: u32) -> u8 {
        self.buf.get(pos as usize).copied().unwrap_or(0)
    }

    /// Extract a source substring as `&str`.
    ///
    /// `start..end` must fall on character boundaries; true whenever both
    /// offsets come from the scanner's own token boundary tracking.
    pub(crate) fn slice(&self, start: u32, end: u32) -> &'a str {
        // The buffer came from a &str, so boundary-aligned slices are valid UTF-8.
        std::str::from_utf8(&self.buf[start as usize..end as usize]).unwrap_or("")
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false`; EOF then terminates the loop.
    #[inline]
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` byte or EOF using memchr.
    ///
    /// Used by the comment scanner; the newline itself is not consumed.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[(self.pos as usize).min(self.buf.len())..];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.buf.len() as u32;
        }
    }

    /// Number of bytes in the UTF-8 character whose leading byte is `byte`.
    ///
    /// ASCII, continuation bytes, and invalid leading bytes all map to 1,
    /// guaranteeing forward progress on malformed input.
    #[inline]
    pub(crate) fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub(crate) fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_returns_zero_at_eof() {
        let mut c = Cursor::new("a");
        assert_eq!(c.current(), b'a');
        c.advance();
        assert_eq!(c.current(), 0);
        assert!(c.is_eof());
    }

    #[test]
    fn eat_until_newline_stops_before_newline() {
        let mut c = Cursor::new("abc\ndef");
        c.eat_until_newline_or_eof();
        assert_eq!(c.pos(), 3);
        assert_eq!(c.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_runs_to_eof_without_newline() {
        let mut c = Cursor::new("abc");
        c.eat_until_newline_or_eof();
        assert_eq!(c.pos(), 3);
        assert!(c.is_eof());
    }

    #[test]
    fn advance_char_handles_multibyte() {
        let mut c = Cursor::new("\u{201C}x");
        c.advance_char();
        assert_eq!(c.pos(), 3); // U+201C is 3 bytes in UTF-8
        assert_eq!(c.current(), b'x');
    }
}
