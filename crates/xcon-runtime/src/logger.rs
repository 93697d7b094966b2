#![forbid(unsafe_code)]

//! Log line producers.
//!
//! A [`Logger`] accepts lines from any thread and fans them out as
//! [`LogEvent`]s to subscribers. The console subscribes once and folds the
//! events into its scroll window on the UI thread.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use xcon_core::LogSink;

/// Change to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Message(String),
    Cleared,
}

/// Shared log.
pub trait Logger: LogSink {
    /// Remove every line.
    fn clear(&self);

    /// Lines logged since the last clear.
    fn line_count(&self) -> usize;

    /// Receive every later event.
    fn subscribe(&self) -> Receiver<LogEvent>;

    /// Subscribe and read the line count together.
    ///
    /// Counted lines are not delivered on the receiver. This default
    /// subscribes first so no line is lost, but a line logged concurrently
    /// may be both counted and delivered.
    fn subscribe_with_count(&self) -> (usize, Receiver<LogEvent>) {
        let rx = self.subscribe();
        (self.line_count(), rx)
    }
}

#[derive(Debug, Default)]
struct State {
    line_count: usize,
    subscribers: Vec<Sender<LogEvent>>,
}

impl State {
    fn broadcast(&mut self, event: &LogEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// In-memory [`Logger`] that fans out over `mpsc` channels.
///
/// Subscribers whose receiver was dropped are pruned on the next event.
#[derive(Debug, Default)]
pub struct ChannelLogger {
    state: Mutex<State>,
}

impl ChannelLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().subscribers.len()
    }
}

impl LogSink for ChannelLogger {
    fn log(&self, line: &str) {
        let mut state = self.state.lock().unwrap();
        state.line_count += 1;
        state.broadcast(&LogEvent::Message(line.to_owned()));
    }
}

impl Logger for ChannelLogger {
    fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.line_count = 0;
        state.broadcast(&LogEvent::Cleared);
        tracing::debug!("log cleared");
    }

    fn line_count(&self) -> usize {
        self.state.lock().unwrap().line_count
    }

    fn subscribe(&self) -> Receiver<LogEvent> {
        self.subscribe_with_count().1
    }

    fn subscribe_with_count(&self) -> (usize, Receiver<LogEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut state = self.state.lock().unwrap();
        state.subscribers.push(tx);
        (state.line_count, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn subscribers_see_messages_in_order() {
        let logger = ChannelLogger::new();
        let rx = logger.subscribe();
        logger.log("one");
        logger.log("two");
        logger.clear();
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                LogEvent::Message("one".into()),
                LogEvent::Message("two".into()),
                LogEvent::Cleared,
            ]
        );
        assert_eq!(logger.line_count(), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_lines() {
        let logger = ChannelLogger::new();
        logger.log("early");
        let rx = logger.subscribe();
        logger.log("late");
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(logger.line_count(), 2);
    }

    #[test]
    fn count_and_delivery_partition_lines_under_contention() {
        let logger = Arc::new(ChannelLogger::new());
        let writer = {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..2000 {
                    logger.log(&format!("line {i}"));
                }
            })
        };
        let (counted, rx) = logger.subscribe_with_count();
        writer.join().unwrap();
        assert_eq!(counted + rx.try_iter().count(), 2000);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let logger = ChannelLogger::new();
        let rx = logger.subscribe();
        let _keep = logger.subscribe();
        drop(rx);
        logger.log("x");
        assert_eq!(logger.subscriber_count(), 1);
    }

    #[test]
    fn logging_from_many_threads() {
        let logger = Arc::new(ChannelLogger::new());
        let rx = logger.subscribe();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..25 {
                        logger.log(&format!("{t}:{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(logger.line_count(), 100);
        assert_eq!(rx.try_iter().count(), 100);
    }
}
