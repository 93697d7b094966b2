#![forbid(unsafe_code)]

//! Word-boundary scanning over the chars of a line.

/// Characters that separate words, in addition to whitespace.
pub const SEPARATORS: &str = ",.;:!?'\"()[]{}<>/\\|-+=*&^%$#@~`";

/// Direction of a caret motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// Whether `c` counts as a word separator.
#[must_use]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(c)
}

/// Position reached by a word motion starting at `pos`.
///
/// Moving left skips separators, then the word before them, landing on the
/// start of that word. Moving right skips the rest of the current word, then
/// the separators after it, landing on the start of the next word. The result
/// is clamped to `0..=chars.len()`.
#[must_use]
pub fn boundary(chars: &[char], pos: usize, direction: Direction) -> usize {
    let len = chars.len();
    let mut pos = pos.min(len);
    match direction {
        Direction::Left => {
            while pos > 0 && is_separator(chars[pos - 1]) {
                pos -= 1;
            }
            while pos > 0 && !is_separator(chars[pos - 1]) {
                pos -= 1;
            }
        }
        Direction::Right => {
            while pos < len && !is_separator(chars[pos]) {
                pos += 1;
            }
            while pos < len && is_separator(chars[pos]) {
                pos += 1;
            }
        }
    }
    pos
}
