#![forbid(unsafe_code)]

//! Half-open ranges of log line indices.

use std::fmt;
use std::ops::Range;

/// Line indices `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineRange {
    pub min: usize,
    pub max: usize,
}

impl LineRange {
    /// Empty range.
    pub const EMPTY: Self = Self { min: 0, max: 0 };

    /// Range `[min, max)`; an inverted pair yields an empty range at `min`.
    #[inline]
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        if max < min {
            Self { min, max: min }
        } else {
            Self { min, max }
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.max - self.min
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.min && index < self.max
    }

    /// Overlap of two ranges, `None` when they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &LineRange) -> Option<LineRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min < max).then_some(LineRange { min, max })
    }

    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.min..self.max
    }
}

impl From<Range<usize>> for LineRange {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}
