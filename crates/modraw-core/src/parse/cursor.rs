//! Byte cursor over one file's in-memory buffer.
//!
//! Framing needs to look at the byte *after* a candidate terminator, and the
//! trailer logic edits the buffer in place, so the cursor is an index into an
//! owned `Vec<u8>` with an explicit save/restore of that index.

use modraw_common::format::LF;
use modraw_common::{Error, Result};

#[derive(Debug, Clone)]
pub struct ByteCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl ByteCursor {
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restore a position previously obtained from [`position`](Self::position).
    /// Positions past the end clamp to the end.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consume one byte. `EndOfInput` means the stream is exhausted.
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek().ok_or(Error::EndOfInput)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read up to and including the next line-feed. The last line of a
    /// buffer may lack one. `None` only when nothing is left.
    pub fn read_line(&mut self) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        while let Ok(byte) = self.read_byte() {
            line.push(byte);
            if byte == LF {
                break;
            }
        }
        (!line.is_empty()).then_some(line)
    }

    /// Does `literal` start at the current position? Never moves the cursor.
    pub fn read_marker(&mut self, literal: &[u8]) -> bool {
        let saved = self.pos;
        let matched = literal
            .iter()
            .all(|&expected| self.read_byte().is_ok_and(|byte| byte == expected));
        self.pos = saved;
        matched
    }

    /// Percentage of the buffer consumed, rounded to one decimal place.
    pub fn progress(&self) -> f64 {
        if self.buf.is_empty() {
            return 100.0;
        }
        let percent = 100.0 * self.pos as f64 / self.buf.len() as f64;
        (percent * 10.0).round() / 10.0
    }

    /// Insert `bytes` at the read position; they are the next bytes read.
    pub fn splice_at_cursor(&mut self, bytes: &[u8]) {
        let pos = self.pos;
        self.buf.splice(pos..pos, bytes.iter().copied());
    }

    /// Cut `range` out of the buffer and return it. The read position is kept
    /// pointing at the same byte where possible.
    pub fn remove_range(&mut self, range: std::ops::Range<usize>) -> Vec<u8> {
        let removed: Vec<u8> = self.buf.drain(range.clone()).collect();
        if self.pos >= range.end {
            self.pos -= removed.len();
        } else if self.pos > range.start {
            self.pos = range.start;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_read() {
        let mut cursor = ByteCursor::new(b"ab".to_vec());
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.read_byte().unwrap(), b'a');
        assert_eq!(cursor.read_byte().unwrap(), b'b');
        assert_eq!(cursor.peek(), None);
        assert!(matches!(cursor.read_byte(), Err(Error::EndOfInput)));
    }

    #[test]
    fn test_read_line_keeps_terminator() {
        let mut cursor = ByteCursor::new(b"one\r\ntwo\nthree".to_vec());
        assert_eq!(cursor.read_line().unwrap(), b"one\r\n");
        assert_eq!(cursor.read_line().unwrap(), b"two\n");
        assert_eq!(cursor.read_line().unwrap(), b"three");
        assert_eq!(cursor.read_line(), None);
    }

    #[test]
    fn test_read_marker_restores_position() {
        let mut cursor = ByteCursor::new(b"T123$".to_vec());
        cursor.read_byte().unwrap();
        assert!(cursor.read_marker(b"123"));
        assert!(!cursor.read_marker(b"124"));
        assert!(!cursor.read_marker(b"123$XYZ"));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_progress_rounding() {
        let mut cursor = ByteCursor::new(vec![0u8; 3]);
        assert_eq!(cursor.progress(), 0.0);
        cursor.read_byte().unwrap();
        assert_eq!(cursor.progress(), 33.3);
        cursor.set_position(99);
        assert_eq!(cursor.progress(), 100.0);
    }

    #[test]
    fn test_splice_and_remove() {
        let mut cursor = ByteCursor::new(b"headbody".to_vec());
        cursor.set_position(4);
        cursor.splice_at_cursor(b"XY");
        assert_eq!(cursor.as_bytes(), b"headXYbody");
        assert_eq!(cursor.read_byte().unwrap(), b'X');

        let cut = cursor.remove_range(6..8);
        assert_eq!(cut, b"bo");
        assert_eq!(cursor.as_bytes(), b"headXYdy");
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_remove_range_before_cursor_shifts_position() {
        let mut cursor = ByteCursor::new(b"0123456789".to_vec());
        cursor.set_position(8);
        cursor.remove_range(2..4);
        assert_eq!(cursor.peek(), Some(b'8'));
    }
}
