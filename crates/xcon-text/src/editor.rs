#![forbid(unsafe_code)]

//! Single-line editing engine for the console command line.
//!
//! [`LineEditor`] owns a text buffer, a caret and a selection. Positions are
//! `char` indices: inserting `s` advances the caret by `s.chars().count()`
//! and the same number of backspaces removes it again. The selection is stored as `(start, len)` and the caret always
//! sits on one of its edges; when nothing is selected `start == cursor`.
//!
//! # Example
//! ```
//! use xcon_text::LineEditor;
//!
//! let mut ed = LineEditor::new();
//! ed.insert("set volume 10");
//! ed.backspace(true);
//! assert_eq!(ed.text(), "set volume ");
//!
//! ed.home(false);
//! ed.move_right(true, true);
//! assert_eq!(ed.selected_text(), Some("set "));
//! ed.insert("get ");
//! assert_eq!(ed.text(), "get volume ");
//! ```

use unicode_width::UnicodeWidthStr;

use crate::clipboard::{Clipboard, ClipboardError};
use crate::word::{self, Direction};

/// Selected span in `char` indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub len: usize,
}

impl Selection {
    /// Selection spanning `a` and `b` in either order.
    #[must_use]
    pub fn between(a: usize, b: usize) -> Self {
        let start = a.min(b);
        Self {
            start,
            len: a.max(b) - start,
        }
    }

    /// Exclusive end index.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Whether typed text shifts or replaces the text under the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Insert,
    Overwrite,
}

/// Single-line text buffer with caret and selection.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    text: String,
    cursor: usize,
    selection: Selection,
    mode: EditMode,
}

impl LineEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor holding `text` with the caret at the end.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut ed = Self::new();
        ed.set_text(text);
        ed
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of `char`s in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    /// Switch between insert and overwrite typing.
    pub fn toggle_edit_mode(&mut self) {
        self.mode = match self.mode {
            EditMode::Insert => EditMode::Overwrite,
            EditMode::Overwrite => EditMode::Insert,
        };
    }

    /// Display column of position `index`, in terminal cells.
    #[must_use]
    pub fn column_at(&self, index: usize) -> usize {
        self.text[..self.byte_offset(index)].width()
    }

    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.column_at(self.cursor)
    }

    /// Currently selected text, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        if self.selection.is_empty() {
            return None;
        }
        let start = self.byte_offset(self.selection.start);
        let end = self.byte_offset(self.selection.end());
        Some(&self.text[start..end])
    }

    // --- Whole-buffer operations ---

    /// Empty the buffer.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.reset_selection();
    }

    /// Replace the buffer and put the caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.len();
        self.reset_selection();
    }

    /// Collapse the selection onto the caret.
    pub fn reset_selection(&mut self) {
        self.selection = Selection {
            start: self.cursor,
            len: 0,
        };
    }

    pub fn select_all(&mut self) {
        let len = self.len();
        self.cursor = len;
        self.selection = Selection { start: 0, len };
    }

    // --- Editing ---

    /// Type `text` at the caret, replacing the selection if there is one.
    ///
    /// In overwrite mode without a selection, the same number of `char`s
    /// to the right of the caret are replaced.
    pub fn insert(&mut self, text: &str) {
        if self.has_selection() {
            self.remove_selection();
        } else if self.mode == EditMode::Overwrite {
            let end = (self.cursor + text.chars().count()).min(self.len());
            self.remove_range(self.cursor, end);
        }
        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
        self.reset_selection();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert(c.encode_utf8(&mut buf));
    }

    /// Delete to the right of the caret.
    ///
    /// Removes the selection if there is one, otherwise one `char` or,
    /// with `whole_word`, everything up to the next word boundary.
    /// Returns whether the buffer changed.
    pub fn delete(&mut self, whole_word: bool) -> bool {
        if self.has_selection() {
            self.remove_selection();
            return true;
        }
        let len = self.len();
        if self.cursor >= len {
            return false;
        }
        let end = if whole_word {
            self.word_boundary(Direction::Right)
        } else {
            self.cursor + 1
        };
        self.remove_range(self.cursor, end);
        self.reset_selection();
        true
    }

    /// Delete to the left of the caret, moving it.
    ///
    /// Mirror of [`delete`](Self::delete). Returns whether the buffer changed.
    pub fn backspace(&mut self, whole_word: bool) -> bool {
        if self.has_selection() {
            self.remove_selection();
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        let start = if whole_word {
            self.word_boundary(Direction::Left)
        } else {
            self.cursor - 1
        };
        self.remove_range(start, self.cursor);
        self.cursor = start;
        self.reset_selection();
        true
    }

    // --- Caret motion ---

    /// Move the caret by `amount` chars, clamped to the buffer.
    ///
    /// With `extend` the selection grows or shrinks from the caret edge while
    /// the opposite edge stays fixed. Without it an active selection is
    /// collapsed onto its edge in the direction of motion, and the caret
    /// travels on past that edge by whatever `amount` exceeds the selection
    /// length. A single step therefore stops on the edge.
    pub fn move_caret(&mut self, amount: isize, extend: bool) {
        if amount == 0 {
            return;
        }
        if extend || !self.has_selection() {
            let target = self.cursor.saturating_add_signed(amount);
            self.move_to(target, extend);
            return;
        }
        let Selection { start, len } = self.selection;
        let beyond = amount.unsigned_abs().saturating_sub(len);
        let target = if amount > 0 {
            start + len + beyond
        } else {
            start.saturating_sub(beyond)
        };
        self.move_to(target, false);
    }

    pub fn move_left(&mut self, extend: bool, by_word: bool) {
        let step = if by_word {
            self.cursor - self.word_boundary(Direction::Left)
        } else {
            1
        };
        self.move_caret(-(step as isize), extend);
    }

    pub fn move_right(&mut self, extend: bool, by_word: bool) {
        let step = if by_word {
            self.word_boundary(Direction::Right) - self.cursor
        } else {
            1
        };
        self.move_caret(step as isize, extend);
    }

    /// Caret to the start of the line, whatever the selection.
    pub fn home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    /// Caret to the end of the line, whatever the selection.
    pub fn end(&mut self, extend: bool) {
        let len = self.len();
        self.move_to(len, extend);
    }

    /// Caret position a word motion in `direction` would reach.
    #[must_use]
    pub fn word_boundary(&self, direction: Direction) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        word::boundary(&chars, self.cursor, direction)
    }

    // --- Clipboard ---

    /// Copy the selection. Returns whether anything was copied.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        match self.selected_text() {
            Some(text) => {
                clipboard.set_text(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Copy the selection, then remove it.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        let copied = self.copy(clipboard)?;
        if copied {
            self.remove_selection();
        }
        Ok(copied)
    }

    /// Insert clipboard text at the caret.
    ///
    /// Line breaks become spaces so the buffer stays a single line.
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) -> Result<bool, ClipboardError> {
        if !clipboard.has_text() {
            return Ok(false);
        }
        let Some(text) = clipboard.get_text()? else {
            return Ok(false);
        };
        let line = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
        self.insert(&line);
        Ok(true)
    }

    // --- Internal helpers ---

    /// Edge of the selection that stays put while extending.
    fn anchor(&self) -> usize {
        if self.selection.is_empty() || self.cursor == self.selection.end() {
            self.selection.start
        } else {
            self.selection.end()
        }
    }

    /// Put the caret on absolute position `target`, clamped.
    fn move_to(&mut self, target: usize, extend: bool) {
        let target = target.min(self.len());
        if extend {
            let anchor = self.anchor();
            self.cursor = target;
            self.selection = Selection::between(anchor, target);
        } else {
            self.cursor = target;
            self.reset_selection();
        }
        debug_assert!(
            self.selection.start == self.cursor || self.selection.end() == self.cursor,
            "caret left the selection edges"
        );
    }

    fn remove_selection(&mut self) {
        let Selection { start, len } = self.selection;
        self.remove_range(start, start + len);
        self.cursor = start;
        self.reset_selection();
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let from = self.byte_offset(start);
        let to = self.byte_offset(end);
        self.text.replace_range(from..to, "");
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn editor(text: &str, cursor: usize) -> LineEditor {
        let mut ed = LineEditor::with_text(text);
        ed.move_to(cursor, false);
        ed
    }

    // ==========================================================================
    // Insert
    // ==========================================================================

    #[test]
    fn insert_at_cursor() {
        let mut ed = editor("helo", 3);
        ed.insert_char('l');
        assert_eq!(ed.text(), "hello");
        assert_eq!(ed.cursor(), 4);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut ed = editor("hello world", 0);
        ed.move_caret(5, true);
        ed.insert("bye");
        assert_eq!(ed.text(), "bye world");
        assert_eq!(ed.cursor(), 3);
        assert!(!ed.has_selection());
    }

    #[test]
    fn overwrite_mode_replaces_under_caret() {
        let mut ed = editor("abcdef", 2);
        ed.toggle_edit_mode();
        assert_eq!(ed.mode(), EditMode::Overwrite);
        ed.insert("XY");
        assert_eq!(ed.text(), "abXYef");
        assert_eq!(ed.cursor(), 4);
        ed.end(false);
        ed.insert("Z");
        assert_eq!(ed.text(), "abXYefZ");
    }

    #[test]
    fn insert_multibyte_counts_chars() {
        let mut ed = LineEditor::new();
        ed.insert("héllo");
        assert_eq!(ed.len(), 5);
        assert_eq!(ed.cursor(), 5);
        ed.backspace(false);
        assert_eq!(ed.text(), "héll");
    }

    #[test]
    fn combining_mark_is_its_own_position() {
        let mut ed = LineEditor::with_text("e");
        ed.insert("\u{301}");
        assert_eq!(ed.text(), "e\u{301}");
        assert_eq!(ed.cursor(), 2);
        ed.backspace(false);
        assert_eq!(ed.text(), "e");
        assert_eq!(ed.cursor(), 1);
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let ed = LineEditor::with_text("ab中");
        assert_eq!(ed.cursor(), 3);
        assert_eq!(ed.cursor_column(), 4);
    }

    // ==========================================================================
    // Delete / backspace
    // ==========================================================================

    #[test]
    fn delete_noop_at_end() {
        let mut ed = LineEditor::with_text("abc");
        assert!(!ed.delete(false));
        assert_eq!(ed.text(), "abc");
    }

    #[test]
    fn backspace_noop_at_start() {
        let mut ed = editor("abc", 0);
        assert!(!ed.backspace(false));
        assert!(!ed.backspace(true));
        assert_eq!(ed.text(), "abc");
    }

    #[test]
    fn delete_char_and_word() {
        let mut ed = editor("foo bar baz", 4);
        assert!(ed.delete(false));
        assert_eq!(ed.text(), "foo ar baz");
        assert!(ed.delete(true));
        assert_eq!(ed.text(), "foo baz");
        assert_eq!(ed.cursor(), 4);
    }

    #[test]
    fn backspace_word() {
        let mut ed = LineEditor::with_text("foo bar  ");
        assert!(ed.backspace(true));
        assert_eq!(ed.text(), "foo ");
        assert_eq!(ed.cursor(), 4);
    }

    #[test]
    fn delete_and_backspace_remove_selection() {
        let mut ed = editor("abcdef", 1);
        ed.move_caret(3, true);
        assert!(ed.backspace(false));
        assert_eq!(ed.text(), "aef");
        assert_eq!(ed.cursor(), 1);

        let mut ed = editor("abcdef", 5);
        ed.move_caret(-2, true);
        assert!(ed.delete(true));
        assert_eq!(ed.text(), "abcf");
        assert_eq!(ed.cursor(), 3);
    }

    // ==========================================================================
    // Selection arithmetic
    // ==========================================================================

    #[test]
    fn extend_right_then_back_across_anchor() {
        let mut ed = editor("abcdefgh", 3);
        ed.move_caret(2, true);
        assert_eq!(ed.selection(), Selection { start: 3, len: 2 });
        ed.move_caret(-4, true);
        assert_eq!(ed.selection(), Selection { start: 1, len: 2 });
        assert_eq!(ed.cursor(), 1);
        ed.move_caret(2, true);
        assert_eq!(ed.selection(), Selection { start: 3, len: 0 });
        assert_eq!(ed.cursor(), 3);
    }

    #[test]
    fn extend_clamps_at_bounds() {
        let mut ed = editor("abc", 1);
        ed.move_caret(10, true);
        assert_eq!(ed.selection(), Selection { start: 1, len: 2 });
        ed.move_caret(-10, true);
        assert_eq!(ed.selection(), Selection { start: 0, len: 1 });
    }

    #[test]
    fn single_step_collapses_to_edge() {
        let mut ed = editor("abcdefgh", 2);
        ed.move_caret(3, true);
        ed.move_left(false, false);
        assert_eq!(ed.cursor(), 2);
        assert!(!ed.has_selection());

        let mut ed = editor("abcdefgh", 5);
        ed.move_caret(-3, true);
        ed.move_right(false, false);
        assert_eq!(ed.cursor(), 5);
    }

    #[test]
    fn long_move_continues_past_the_far_edge() {
        // Caret on the right edge of "cde": collapse there, then one more.
        let mut ed = editor("abcdefghij", 2);
        ed.move_caret(3, true);
        assert_eq!(ed.cursor(), 5);
        ed.move_caret(4, false);
        assert_eq!(ed.cursor(), 6);
        assert!(!ed.has_selection());

        // Caret on the left edge: jump over the selection, then the rest.
        let mut ed = editor("abcdefghij", 5);
        ed.move_caret(-3, true);
        assert_eq!(ed.cursor(), 2);
        ed.move_caret(4, false);
        assert_eq!(ed.cursor(), 6);
    }

    #[test]
    fn long_move_left_mirrors_right() {
        let mut ed = editor("abcdefghij", 2);
        ed.move_caret(3, true);
        ed.move_caret(-4, false);
        assert_eq!(ed.cursor(), 1);

        let mut ed = editor("abcdefghij", 5);
        ed.move_caret(-3, true);
        ed.move_caret(-4, false);
        assert_eq!(ed.cursor(), 1);
    }

    #[test]
    fn move_within_selection_length_stops_on_edge() {
        let mut ed = editor("abcdefghij", 2);
        ed.move_caret(5, true);
        ed.move_caret(-3, false);
        assert_eq!(ed.cursor(), 2);

        let mut ed = editor("abcdefghij", 9);
        ed.move_caret(-2, true);
        ed.move_caret(20, false);
        assert_eq!(ed.cursor(), 10);
    }

    #[test]
    fn home_end_ignore_selection_edges() {
        let mut ed = editor("abcdefgh", 1);
        ed.move_caret(3, true);
        ed.end(false);
        assert_eq!(ed.cursor(), 8);

        let mut ed = editor("abcdefgh", 4);
        ed.move_caret(-3, true);
        ed.home(false);
        assert_eq!(ed.cursor(), 0);

        let mut ed = editor("abcdefgh", 2);
        ed.move_caret(3, true);
        ed.end(false);
        assert_eq!(ed.cursor(), 8);
    }

    #[test]
    fn shift_home_end_extend() {
        let mut ed = editor("abcdef", 3);
        ed.home(true);
        assert_eq!(ed.selection(), Selection { start: 0, len: 3 });
        ed.end(true);
        assert_eq!(ed.selection(), Selection { start: 3, len: 3 });
    }

    #[test]
    fn select_all_and_reset() {
        let mut ed = LineEditor::with_text("abc");
        ed.select_all();
        assert_eq!(ed.selected_text(), Some("abc"));
        ed.reset_selection();
        assert_eq!(ed.selected_text(), None);
        ed.reset();
        assert!(ed.is_empty());
        assert_eq!(ed.cursor(), 0);
    }

    #[test]
    fn word_motion_with_extend() {
        let mut ed = editor("one two three", 0);
        ed.move_right(true, true);
        ed.move_right(true, true);
        assert_eq!(ed.selected_text(), Some("one two "));
        ed.move_left(true, true);
        assert_eq!(ed.selected_text(), Some("one "));
    }

    // ==========================================================================
    // Clipboard
    // ==========================================================================

    #[test]
    fn copy_cut_paste() {
        let mut cb = MemoryClipboard::new();
        let mut ed = editor("hello world", 6);
        assert_eq!(ed.copy(&mut cb), Ok(false));

        ed.end(true);
        assert_eq!(ed.cut(&mut cb), Ok(true));
        assert_eq!(ed.text(), "hello ");
        ed.home(false);
        assert_eq!(ed.paste(&mut cb), Ok(true));
        assert_eq!(ed.text(), "worldhello ");
        assert_eq!(ed.cursor(), 5);
    }

    #[test]
    fn paste_flattens_line_breaks() {
        let mut cb = MemoryClipboard::new();
        cb.set_text("a\r\nb\nc").unwrap();
        let mut ed = LineEditor::new();
        ed.paste(&mut cb).unwrap();
        assert_eq!(ed.text(), "a b c");
    }
}
