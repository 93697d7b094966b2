#![forbid(unsafe_code)]

//! Error types for core containers.

use std::fmt;

/// Errors returned by [`RingBuffer`](crate::RingBuffer) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
    /// The buffer holds no items.
    Empty,
    /// The logical index is not below the item count.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for RingBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "ring buffer is empty"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for ring buffer of length {len}")
            }
        }
    }
}

impl std::error::Error for RingBufferError {}
