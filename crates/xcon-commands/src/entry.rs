#![forbid(unsafe_code)]

//! Registered command descriptors.

use std::fmt;
use std::sync::{Arc, Mutex};

use xcon_core::LogSink;

use crate::dispatch::LinePrefixes;
use crate::flags::CommandFlags;
use crate::registry::CommandRegistry;

/// Failure reported by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Arguments did not match the command's argument description.
    InvalidSyntax,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax => write!(f, "invalid syntax"),
        }
    }
}

impl std::error::Error for CommandError {}

/// What a handler can reach while it runs.
pub struct CommandContext<'a> {
    pub(crate) registry: &'a CommandRegistry,
    pub(crate) sink: &'a dyn LogSink,
    pub(crate) prefixes: &'a LinePrefixes,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(
        registry: &'a CommandRegistry,
        sink: &'a dyn LogSink,
        prefixes: &'a LinePrefixes,
    ) -> Self {
        Self {
            registry,
            sink,
            prefixes,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    #[must_use]
    pub fn prefixes(&self) -> &LinePrefixes {
        self.prefixes
    }

    /// Write one line of output.
    pub fn log(&self, line: &str) {
        self.sink.log(line);
    }
}

pub type Handler =
    Box<dyn Fn(&CommandContext<'_>, &str) -> Result<(), CommandError> + Send + Sync>;

pub type StatusFn = Box<dyn Fn() -> String + Send + Sync>;

/// A named command with its metadata and handler.
pub struct CommandEntry {
    name: String,
    flags: CommandFlags,
    args: String,
    info: String,
    status: Option<StatusFn>,
    handler: Handler,
}

impl CommandEntry {
    /// Enabled function command with no argument description.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>, &str) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            flags: CommandFlags::default(),
            args: String::new(),
            info: String::new(),
            status: None,
            handler: Box::new(handler),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    #[must_use]
    pub fn with_status<F>(mut self, status: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.status = Some(Box::new(status));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(CommandFlags::ENABLED, enabled);
    }

    /// Human-readable description of the accepted arguments.
    #[must_use]
    pub fn args(&self) -> &str {
        &self.args
    }

    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Current value, for variables.
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.status.as_ref().map(|f| f())
    }

    /// Run the handler with the (already trimmed) argument string.
    pub fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> Result<(), CommandError> {
        (self.handler)(ctx, args)
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("args", &self.args)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Getter/setter pair bound to an application value.
pub struct Accessor<T> {
    get: Arc<dyn Fn() -> T + Send + Sync>,
    set: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<T: 'static> Accessor<T> {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) {
        (self.set)(value);
    }
}

impl<T: Clone + Send + 'static> Accessor<T> {
    /// Accessor over a value shared behind a mutex.
    #[must_use]
    pub fn shared(value: Arc<Mutex<T>>) -> Self {
        let read = Arc::clone(&value);
        Self::new(
            move || read.lock().unwrap().clone(),
            move |v| *value.lock().unwrap() = v,
        )
    }
}
