#![forbid(unsafe_code)]

//! Scrollback storage and the visible window over it.
//!
//! [`ScrollWindow`] keeps the most recent log lines in a [`RingBuffer`] and
//! tracks which line is the newest one on screen. Line indices are absolute:
//! line `0` is the first line ever logged, even after it has been evicted.
//! Only `[total - buffered, total)` is resident.
//!
//! Appending follows the tail only while the view is at the bottom. A view
//! that was scrolled back stays put, except that it is pulled forward when
//! the lines under it are evicted.

use xcon_core::RingBuffer;

use crate::range::LineRange;

/// Default number of resident scrollback lines.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Scrollback lines plus the scroll position.
#[derive(Debug, Clone)]
pub struct ScrollWindow {
    lines: RingBuffer<String>,
    total: usize,
    newest_visible: Option<usize>,
}

impl Default for ScrollWindow {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ScrollWindow {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: RingBuffer::with_capacity(capacity),
            total: 0,
            newest_visible: None,
        }
    }

    /// Lines ever logged (or reported by the logger), resident or not.
    #[must_use]
    pub fn total_line_count(&self) -> usize {
        self.total
    }

    /// Index of the newest visible line, `None` when nothing was logged.
    #[must_use]
    pub fn newest_visible(&self) -> Option<usize> {
        self.newest_visible
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    /// Number of resident lines.
    #[must_use]
    pub fn buffered_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the oldest resident line.
    #[must_use]
    pub fn first_buffered(&self) -> usize {
        self.total - self.lines.len()
    }

    #[must_use]
    pub fn buffered_range(&self) -> LineRange {
        LineRange::new(self.first_buffered(), self.total)
    }

    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.newest_visible == self.total.checked_sub(1)
    }

    /// Start over from a logger that already holds `line_count` lines.
    ///
    /// None of them are resident; the view sits at the bottom.
    pub fn attach(&mut self, line_count: usize) {
        self.lines.clear();
        self.total = line_count;
        self.newest_visible = line_count.checked_sub(1);
    }

    /// Append a logged line. Returns whether the view followed the tail.
    pub fn push_line(&mut self, line: impl Into<String>) -> bool {
        let follow = self.is_at_bottom();
        let was_full = self.lines.is_full();
        self.lines.push(line.into());
        self.total += 1;
        if follow {
            self.newest_visible = Some(self.total - 1);
        } else {
            self.clamp_to_buffered();
        }
        if was_full {
            tracing::trace!(first_buffered = self.first_buffered(), "scrollback evicted line");
        }
        follow
    }

    /// Forget every line, as when the log is cleared.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = 0;
        self.newest_visible = None;
    }

    /// Change how many lines stay resident, keeping the newest.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.lines.set_capacity(capacity);
        self.clamp_to_buffered();
    }

    /// Resident line at absolute `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        let first = self.first_buffered();
        if index < first {
            return None;
        }
        self.lines.get(index - first).ok().map(String::as_str)
    }

    /// Move toward newer lines by up to `n`. Returns whether the view moved.
    pub fn scroll_down(&mut self, n: usize) -> bool {
        let Some(newest) = self.newest_visible else {
            return false;
        };
        let available = self.total.saturating_sub(newest + 1);
        let step = n.min(available);
        if step == 0 {
            return false;
        }
        self.newest_visible = Some(newest + step);
        true
    }

    /// Move toward older lines by up to `n`, never past the oldest resident
    /// line. Returns whether the view moved.
    pub fn scroll_up(&mut self, n: usize) -> bool {
        let Some(newest) = self.newest_visible else {
            return false;
        };
        let available = newest.saturating_sub(self.first_buffered());
        let step = n.min(available);
        if step == 0 {
            return false;
        }
        self.newest_visible = Some(newest - step);
        true
    }

    /// Jump to the newest line. Returns whether the view moved.
    pub fn scroll_to_bottom(&mut self) -> bool {
        let bottom = self.total.checked_sub(1);
        let moved = self.newest_visible != bottom;
        self.newest_visible = bottom;
        moved
    }

    /// Lines shown in a viewport `rows` tall, bottom-anchored on the newest
    /// visible line and clipped to the resident range.
    #[must_use]
    pub fn visible_range(&self, rows: usize) -> LineRange {
        let end = self.newest_visible.map_or(0, |i| i + 1);
        let start = end.saturating_sub(rows).max(self.first_buffered());
        LineRange::new(start, end)
    }

    fn clamp_to_buffered(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let first = self.first_buffered();
        if let Some(newest) = self.newest_visible
            && newest < first
        {
            self.newest_visible = Some(first);
        }
    }
}
