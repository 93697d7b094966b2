#![forbid(unsafe_code)]

//! Fixed-capacity circular buffer.
//!
//! [`RingBuffer`] stores at most `capacity` items. Pushing into a full buffer
//! evicts the oldest item, so it never fails. Logical index `0` is always the
//! oldest retained item and `len() - 1` the newest.
//!
//! The capacity can be changed at runtime. Shrinking keeps the most recent
//! items in order; growing keeps everything. A capacity of zero turns
//! [`push`](RingBuffer::push) into a no-op.
//!
//! # Example
//!
//! ```
//! use xcon_core::RingBuffer;
//!
//! let mut buf = RingBuffer::with_capacity(3);
//! for i in 0..5 {
//!     buf.push(i);
//! }
//! assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
//!
//! buf.set_capacity(2);
//! assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use crate::error::RingBufferError;

/// Circular buffer with eviction of the oldest item on overflow.
#[derive(Clone)]
pub struct RingBuffer<T> {
    /// Physical storage, grown on demand up to `cap` slots. Until it is full
    /// the live window never wraps.
    ///
    /// Slots outside the live window may still hold stale values after
    /// [`clear`](Self::clear); they are dropped when overwritten.
    slots: Vec<Option<T>>,
    cap: usize,
    /// Physical index of the oldest item.
    head: usize,
    /// Number of live items.
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            cap: capacity,
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of retained items.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Number of retained items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the next push evicts an item.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity() && self.capacity() > 0
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        (self.head + logical) % self.cap
    }

    /// Append an item, evicting the oldest one when full.
    ///
    /// Does nothing when the capacity is zero.
    pub fn push(&mut self, item: T) {
        let cap = self.capacity();
        if cap == 0 {
            return;
        }
        let tail = self.physical(self.len);
        if tail == self.slots.len() {
            self.slots.push(Some(item));
        } else {
            self.slots[tail] = Some(item);
        }
        if self.len == cap {
            self.head = (self.head + 1) % cap;
        } else {
            self.len += 1;
        }
    }

    /// Borrow the oldest item.
    pub fn peek_oldest(&self) -> Result<&T, RingBufferError> {
        if self.len == 0 {
            return Err(RingBufferError::Empty);
        }
        self.slots[self.head].as_ref().ok_or(RingBufferError::Empty)
    }

    /// Remove and return the oldest item.
    pub fn pop_oldest(&mut self) -> Result<T, RingBufferError> {
        if self.len == 0 {
            return Err(RingBufferError::Empty);
        }
        let item = self.slots[self.head].take().ok_or(RingBufferError::Empty)?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Ok(item)
    }

    /// Borrow the item at logical `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Result<&T, RingBufferError> {
        let out_of_range = RingBufferError::IndexOutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }
        self.slots[self.physical(index)]
            .as_ref()
            .ok_or(out_of_range)
    }

    /// Borrow the most recently pushed item.
    #[must_use]
    pub fn newest(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i).ok())
    }

    /// Forget every item without releasing storage.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Change the capacity, keeping the `min(len, capacity)` newest items.
    ///
    /// A capacity of zero clears the buffer and releases its storage.
    pub fn set_capacity(&mut self, capacity: usize) {
        let old = self.capacity();
        if capacity == old {
            return;
        }
        if capacity == 0 {
            self.slots = Vec::new();
            self.cap = 0;
            self.head = 0;
            self.len = 0;
            tracing::trace!(from = old, to = 0, "ring buffer storage released");
            return;
        }

        let retained = self.len.min(capacity);
        let skip = self.len - retained;
        let mut slots = Vec::with_capacity(capacity);
        // The live window may wrap; walking logical indices covers both runs.
        for logical in skip..self.len {
            let src = self.physical(logical);
            slots.push(self.slots[src].take());
        }
        self.slots = slots;
        self.cap = capacity;
        self.head = 0;
        self.len = retained;
        tracing::trace!(from = old, to = capacity, retained, "ring buffer resized");
    }

    /// Iterate from oldest to newest.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buf: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`RingBuffer`], oldest first.
pub struct Iter<'a, T> {
    buf: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buf.get(self.front).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buf.get(self.back).ok()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
