#![forbid(unsafe_code)]

//! The picker's query line: filter text plus a grapheme cursor.
//!
//! Editing methods return `true` when the text changed, which is the signal
//! to re-run the external filter. Cursor motion never changes the text.

use unicode_segmentation::UnicodeSegmentation;

/// Single-line query text with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryLine {
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
}

impl QueryLine {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query holding `value` with the cursor at the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.grapheme_count();
        self
    }

    /// The query text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position (grapheme index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the query is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the text wholesale and park the cursor at the end.
    ///
    /// Returns `false` (and leaves the cursor alone) when `value` equals the
    /// current text.
    pub fn set_value(&mut self, value: &str) -> bool {
        if self.value == value {
            return false;
        }
        self.value.clear();
        self.value.push_str(value);
        self.cursor = self.grapheme_count();
        true
    }

    /// Clear all text.
    pub fn clear(&mut self) -> bool {
        self.cursor = 0;
        if self.value.is_empty() {
            return false;
        }
        self.value.clear();
        true
    }

    // --- Editing ---

    /// Insert `text` at the cursor and move past it.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let before = self.grapheme_count();
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert_str(byte_offset, text);
        // Combining marks and joiners may merge with neighbouring graphemes.
        let after = self.grapheme_count();
        self.cursor = (self.cursor + after.saturating_sub(before)).min(after);
        true
    }

    /// Insert a single character at the cursor.
    pub fn insert_char(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    /// Delete the grapheme before the cursor (Backspace).
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor - 1);
        let byte_end = self.grapheme_byte_offset(self.cursor);
        self.value.drain(byte_start..byte_end);
        self.cursor -= 1;
        true
    }

    /// Delete the grapheme under the cursor (Delete).
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(self.cursor);
        let byte_end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.drain(byte_start..byte_end);
        true
    }

    /// Delete back to the start of the previous word (Ctrl+W).
    pub fn delete_word_back(&mut self) -> bool {
        let end = self.cursor;
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut start = end.min(graphemes.len());
        while start > 0 && is_space(graphemes[start - 1]) {
            start -= 1;
        }
        while start > 0 && !is_space(graphemes[start - 1]) {
            start -= 1;
        }
        if start == end {
            return false;
        }
        let byte_start = self.grapheme_byte_offset(start);
        let byte_end = self.grapheme_byte_offset(end);
        self.value.drain(byte_start..byte_end);
        self.cursor = start;
        true
    }

    // --- Cursor motion ---

    /// Move one grapheme left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move one grapheme right.
    pub fn move_right(&mut self) {
        if self.cursor < self.grapheme_count() {
            self.cursor += 1;
        }
    }

    /// Move to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}
