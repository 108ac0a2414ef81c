//! Forward-only reader over XML bytes
//!
//! Lines start at 1 and columns count characters, so a multi-byte UTF-8
//! sequence moves the column once.

use crate::error::Pos;

#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    at: Pos,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            at: Pos::new(0, 1, 1),
        }
    }

    pub fn current(&self) -> Option<u8> {
        self.input.get(self.at.offset).copied()
    }

    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    /// Step over one byte; a no-op at end of input
    pub fn advance(&mut self) {
        let Some(b) = self.current() else {
            return;
        };
        self.at.offset += 1;
        match b {
            b'\n' => {
                self.at.line += 1;
                self.at.col = 1;
            }
            b if is_continuation_byte(b) => {}
            _ => self.at.col += 1,
        }
    }

    pub fn advance_by(&mut self, count: usize) {
        (0..count).for_each(|_| self.advance());
    }

    pub fn skip_whitespace(&mut self) {
        while self.current().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    /// Step over `expected` if it is next
    pub fn consume(&mut self, expected: u8) -> bool {
        let matched = self.current() == Some(expected);
        if matched {
            self.advance();
        }
        matched
    }

    pub const fn position(&self) -> Pos {
        self.at
    }

    pub const fn is_eof(&self) -> bool {
        self.at.offset >= self.input.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.at.offset..).unwrap_or_default()
    }

    /// Byte offset of the cursor
    pub const fn pos(&self) -> usize {
        self.at.offset
    }

    /// Bytes from `start` up to the cursor
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.at.offset).unwrap_or_default()
    }
}

/// The four whitespace bytes of the XML `S` production
pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

const fn is_continuation_byte(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_basic() {
        let mut cursor = Cursor::new(b"hello");
        assert_eq!(cursor.current(), Some(b'h'));
        cursor.advance();
        assert_eq!(cursor.current(), Some(b'e'));
    }

    #[test]
    fn test_cursor_whitespace() {
        let mut cursor = Cursor::new(b"  \t\nhello");
        cursor.skip_whitespace();
        assert_eq!(cursor.current(), Some(b'h'));
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().col, 1);
    }

    #[test]
    fn test_cursor_consume() {
        let mut cursor = Cursor::new(b"abc");
        assert!(cursor.consume(b'a'));
        assert!(!cursor.consume(b'z'));
        assert_eq!(cursor.current(), Some(b'b'));
    }

    #[test]
    fn test_cursor_eof() {
        let cursor = Cursor::new(b"");
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), None);
        assert!(cursor.remaining().is_empty());
    }

    #[test]
    fn test_cursor_slice() {
        let mut cursor = Cursor::new(b"hello world");
        let start = cursor.pos();
        cursor.advance_by(3);
        assert_eq!(cursor.slice_from(start), b"hel");
        assert!(cursor.starts_with(b"lo w"));
    }

    #[test]
    fn test_cursor_counts_characters_for_columns() {
        let mut cursor = Cursor::new("é<".as_bytes());
        cursor.advance_by(2);
        assert_eq!(cursor.current(), Some(b'<'));
        assert_eq!(cursor.position().col, 2);
    }
}
