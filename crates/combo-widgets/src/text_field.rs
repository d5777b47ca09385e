#![forbid(unsafe_code)]

//! Single-line text field state.
//!
//! Holds the combobox's InputText and a caret. Cursor positions are
//! grapheme indices so accented names and combining marks edit as a unit.
//! Every method that can change `value` reports whether it did; the
//! combobox treats a `true` as a "text changed" event.

use unicode_segmentation::UnicodeSegmentation;

/// Editable text plus caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    /// Text value.
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
}

impl TextField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Caret position as a grapheme index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the value and put the caret at the end.
    ///
    /// Returns `true` if the value changed.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = value != self.value;
        self.value = value;
        self.cursor = self.grapheme_count();
        changed
    }

    /// Remove all text. Returns `true` if there was any.
    pub fn clear(&mut self) -> bool {
        self.cursor = 0;
        if self.value.is_empty() {
            return false;
        }
        self.value.clear();
        true
    }

    /// Insert one character at the caret.
    pub fn insert_char(&mut self, c: char) -> bool {
        let byte = self.grapheme_byte_offset(self.cursor);
        self.value.insert(byte, c);
        // A combining mark can merge into the previous grapheme, so the
        // caret is recomputed from the byte position rather than incremented.
        self.cursor = self.grapheme_index_at(byte + c.len_utf8());
        true
    }

    /// Insert a string at the caret (paste). Line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let cleaned: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        if cleaned.is_empty() {
            return false;
        }
        let byte = self.grapheme_byte_offset(self.cursor);
        self.value.insert_str(byte, &cleaned);
        self.cursor = self.grapheme_index_at(byte + cleaned.len());
        true
    }

    /// Delete the grapheme before the caret (Backspace).
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor - 1);
        let end = self.grapheme_byte_offset(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Delete the grapheme after the caret (Delete).
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor);
        let end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.replace_range(start..end, "");
        true
    }

    /// Move the caret one grapheme left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the caret one grapheme right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.grapheme_count());
    }

    /// Move the caret to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the caret to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, index: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn grapheme_index_at(&self, byte: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .take_while(|(i, _)| *i < byte)
            .count()
    }
}
