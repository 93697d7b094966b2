#![forbid(unsafe_code)]

//! Destination for console output lines.

use std::sync::Arc;

/// Receives lines of console output.
///
/// Implementations must tolerate calls from any thread.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, line: &str) {
        (**self).log(line);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn log(&self, line: &str) {
        (**self).log(line);
    }
}
