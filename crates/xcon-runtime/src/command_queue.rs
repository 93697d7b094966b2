#![forbid(unsafe_code)]

//! Background command execution.
//!
//! Submitted command lines are queued in a bounded FIFO and executed one at
//! a time, in submission order, on a dedicated worker thread. The UI thread
//! never blocks on a handler.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use xcon_commands::CommandDispatcher;

/// Default number of pending commands.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Default time [`CommandProcessor::shutdown`] waits for the worker.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(5000);

/// Reason a command was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The queue already holds its capacity of pending commands.
    QueueFull { capacity: usize },
    /// The processor has been shut down.
    ShutDown,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull { capacity } => {
                write!(f, "command queue full ({capacity} pending)")
            }
            Self::ShutDown => write!(f, "command processor is shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// The worker did not finish within the shutdown timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownError {
    Timeout(Duration),
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(waited) => {
                write!(f, "command worker still running after {waited:?}")
            }
        }
    }
}

impl std::error::Error for ShutdownError {}

#[derive(Debug)]
struct Queue {
    pending: VecDeque<String>,
    shut_down: bool,
}

#[derive(Debug)]
struct Shared {
    queue: Mutex<Queue>,
    ready: Condvar,
}

/// Bounded command queue drained by one worker thread.
pub struct CommandProcessor {
    shared: Arc<Shared>,
    capacity: usize,
    worker: Option<JoinHandle<()>>,
    done: Receiver<()>,
}

impl CommandProcessor {
    /// Start a worker that executes each line through `dispatcher`.
    pub fn with_dispatcher(dispatcher: CommandDispatcher, capacity: usize) -> io::Result<Self> {
        Self::spawn(capacity, move |line: String| {
            dispatcher.execute(&line);
        })
    }

    /// Start a worker that passes each line to `execute`.
    pub fn spawn(
        capacity: usize,
        mut execute: impl FnMut(String) + Send + 'static,
    ) -> io::Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                pending: VecDeque::with_capacity(capacity),
                shut_down: false,
            }),
            ready: Condvar::new(),
        });
        let (done_tx, done) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("xcon-commands".into())
            .spawn(move || {
                loop {
                    let line = {
                        let mut queue = worker_shared.queue.lock().unwrap();
                        while queue.pending.is_empty() && !queue.shut_down {
                            queue = worker_shared.ready.wait(queue).unwrap();
                        }
                        if queue.shut_down {
                            break;
                        }
                        match queue.pending.pop_front() {
                            Some(line) => line,
                            None => continue,
                        }
                    };
                    execute(line);
                }
                let _ = done_tx.send(());
            })?;
        tracing::debug!(capacity, "command worker started");
        Ok(Self {
            shared,
            capacity,
            worker: Some(worker),
            done,
        })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Commands waiting to run (excludes the one executing).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().unwrap().pending.len()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shared.queue.lock().unwrap().shut_down
    }

    /// Queue a command line for execution.
    pub fn submit(&self, line: impl Into<String>) -> Result<(), SubmitError> {
        let mut queue = self.shared.queue.lock().unwrap();
        if queue.shut_down {
            return Err(SubmitError::ShutDown);
        }
        if queue.pending.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "command queue full");
            return Err(SubmitError::QueueFull {
                capacity: self.capacity,
            });
        }
        queue.pending.push_back(line.into());
        tracing::trace!(pending = queue.pending.len(), "command queued");
        drop(queue);
        self.shared.ready.notify_one();
        Ok(())
    }

    /// Cancel pending commands and wait up to `timeout` for the worker to
    /// finish the command it is running.
    ///
    /// Returns the number of cancelled commands. Calling it again after a
    /// successful shutdown returns `Ok(0)`.
    pub fn shutdown(&mut self, timeout: Duration) -> Result<usize, ShutdownError> {
        let cancelled = {
            let mut queue = self.shared.queue.lock().unwrap();
            queue.shut_down = true;
            let cancelled = queue.pending.len();
            queue.pending.clear();
            cancelled
        };
        self.shared.ready.notify_all();

        let Some(worker) = self.worker.take() else {
            return Ok(0);
        };
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if worker.join().is_err() {
                    tracing::warn!("command worker panicked");
                }
                tracing::debug!(cancelled, "command worker stopped");
                Ok(cancelled)
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(?timeout, "command worker did not stop in time");
                Err(ShutdownError::Timeout(timeout))
            }
        }
    }
}

impl Drop for CommandProcessor {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

impl fmt::Debug for CommandProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandProcessor")
            .field("capacity", &self.capacity)
            .field("pending", &self.pending())
            .field("running", &self.worker.is_some())
            .finish()
    }
}
