#![forbid(unsafe_code)]

//! The edit buffer: UTF-8 content plus a codepoint-counted cursor offset.
//!
//! The cursor is stored as a distance from the *end* of the content, counted
//! in codepoints. Arrow-key navigation only ever adjusts this distance, so
//! no absolute index has to be rewritten when text is inserted or removed
//! before the cursor.
//!
//! # Invariants
//!
//! - Content is valid UTF-8 after every operation (insertions and deletions
//!   always cover whole codepoints).
//! - `0 <= offset_from_end() <= len_codepoints()` before and after every
//!   operation.

use std::io;

/// True for UTF-8 continuation bytes (`10xxxxxx`).
#[inline]
pub(crate) const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// A growable UTF-8 line buffer with an embedded edit cursor.
#[derive(Debug, Default)]
pub struct LineBuffer {
    text: String,
    /// Codepoints between the edit cursor and the end of the content.
    offset_from_end: usize,
}

impl LineBuffer {
    /// Create an empty buffer with the cursor at the (empty) end.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content length in codepoints.
    #[must_use]
    pub fn len_codepoints(&self) -> usize {
        self.text.bytes().filter(|b| !is_continuation(*b)).count()
    }

    /// Codepoints between the cursor and the end of the content.
    #[must_use]
    pub fn offset_from_end(&self) -> usize {
        self.offset_from_end
    }

    /// True when the buffer holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Current content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte index of the edit cursor, derived by a forward scan counting
    /// lead bytes up to `len - offset_from_end` codepoints.
    fn cursor_byte_index(&self) -> usize {
        let target = self.len_codepoints() - self.offset_from_end;
        let bytes = self.text.as_bytes();
        let mut leads_seen = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if !is_continuation(b) {
                if leads_seen == target {
                    return i;
                }
                leads_seen += 1;
            }
        }
        bytes.len()
    }

    /// Insert one codepoint at the cursor, shifting later content right.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::OutOfMemory`] when the buffer cannot grow.
    /// The session treats this as fatal; the caller still restores terminal
    /// mode on the way out.
    pub fn insert(&mut self, ch: char) -> io::Result<()> {
        self.text
            .try_reserve(ch.len_utf8())
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        let idx = self.cursor_byte_index();
        self.text.insert(idx, ch);
        Ok(())
    }

    /// Remove the whole codepoint before the cursor.
    ///
    /// Walks backward over continuation bytes to the codepoint's lead byte
    /// and removes all of its bytes atomically. No-op when the cursor is at
    /// the logical start of the buffer.
    pub fn delete_before_cursor(&mut self) -> bool {
        let idx = self.cursor_byte_index();
        if idx == 0 {
            return false;
        }
        let bytes = self.text.as_bytes();
        let mut start = idx - 1;
        while is_continuation(bytes[start]) {
            start -= 1;
        }
        self.text.drain(start..idx);
        true
    }

    /// Remove the whole codepoint under the cursor without moving it.
    ///
    /// No-op when the cursor is at the end of the content.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.offset_from_end == 0 {
            return false;
        }
        let idx = self.cursor_byte_index();
        let bytes = self.text.as_bytes();
        let mut end = idx + 1;
        while end < bytes.len() && is_continuation(bytes[end]) {
            end += 1;
        }
        self.text.drain(idx..end);
        self.offset_from_end -= 1;
        true
    }

    /// Move the edit cursor one codepoint toward the start.
    ///
    /// Returns `false` (no-op) when already at the start.
    pub fn cursor_left(&mut self) -> bool {
        if self.offset_from_end < self.len_codepoints() {
            self.offset_from_end += 1;
            true
        } else {
            false
        }
    }

    /// Move the edit cursor one codepoint toward the end.
    ///
    /// Returns `false` (no-op) when already at the end.
    pub fn cursor_right(&mut self) -> bool {
        if self.offset_from_end > 0 {
            self.offset_from_end -= 1;
            true
        } else {
            false
        }
    }

    /// Discard all content and reset the cursor.
    pub fn clear(&mut self) {
        self.text.clear();
        self.offset_from_end = 0;
    }

    /// Finalize the edit and hand the content to the caller.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}
