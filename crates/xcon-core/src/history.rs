#![forbid(unsafe_code)]

//! Command history backed by a [`RingBuffer`].
//!
//! The history keeps a browsing cursor. [`prev`](HistoryCache::prev) walks
//! toward older entries and sticks at the oldest one.
//! [`next`](HistoryCache::next) walks toward newer entries and returns `None`
//! once the newest entry has been passed. Pushing a command resets the cursor
//! to the newest entry.

use crate::ring_buffer::RingBuffer;

/// Default number of remembered commands.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Bounded list of previously submitted command lines.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: RingBuffer<String>,
    cursor: Option<usize>,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryCache {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::with_capacity(capacity),
            cursor: None,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Change the capacity, keeping the newest entries, and reset the cursor.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.entries.set_capacity(capacity);
        self.reset();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the browsing cursor (0 = oldest).
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Remember `command` unless it repeats the newest entry.
    pub fn push(&mut self, command: impl Into<String>) {
        let command = command.into();
        if self.entries.newest().is_some_and(|last| *last == command) {
            self.reset();
            return;
        }
        self.entries.push(command);
        self.reset();
    }

    /// Point the cursor at the newest entry.
    pub fn reset(&mut self) {
        self.cursor = self.entries.len().checked_sub(1);
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|i| self.entries.get(i).ok())
            .map(String::as_str)
    }

    /// Step to the previous (older) entry and return it.
    ///
    /// Stays on the oldest entry once reached.
    pub fn prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.cursor = Some(idx);
        self.current()
    }

    /// Step to the next (newer) entry and return it.
    ///
    /// Returns `None` when the cursor is already on the newest entry.
    pub fn next(&mut self) -> Option<&str> {
        let idx = self.cursor?;
        if idx + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(idx + 1);
        self.current()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
