#![forbid(unsafe_code)]

//! Core: ring-buffer storage, command history, and the log sink seam.

pub mod error;
pub mod history;
pub mod ring_buffer;
pub mod sink;

pub use error::RingBufferError;
pub use history::HistoryCache;
pub use ring_buffer::RingBuffer;
pub use sink::LogSink;
