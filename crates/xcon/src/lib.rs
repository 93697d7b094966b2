#![forbid(unsafe_code)]

//! Embeddable interactive console.
//!
//! Re-exports the commonly used types of the `xcon-*` crates and a prelude.
//!
//! ```no_run
//! use xcon::prelude::*;
//!
//! # fn main() -> xcon::Result<()> {
//! let mut console = Console::new(ConsoleConfig::from_env()?)?;
//! console.add_command(kinds::function("quit", "leave", || {}))?;
//! console.handle_key(KeyEvent::new(KeyCode::Char('q')));
//! console.pump();
//! console.shutdown()?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use xcon_core::{HistoryCache, LogSink, RingBuffer, RingBufferError};

// --- Text re-exports -------------------------------------------------------

pub use xcon_text::{Clipboard, ClipboardError, EditMode, LineEditor, MemoryClipboard, Selection};

// --- Command re-exports ----------------------------------------------------

pub use xcon_commands::{
    Accessor, CommandContext, CommandDispatcher, CommandEntry, CommandError, CommandFlags,
    CommandRegistry, DispatchOutcome, LinePrefixes, RegistryError, kinds,
};

// --- Render re-exports -----------------------------------------------------

pub use xcon_render::{
    ConsoleView, HeaderLabels, LineColorizer, LineRange, PrefixColorizer, Rect, RedrawOp,
    RedrawPlan, RenderContext, Rgb, ScrollWindow, Surface, ViewStyle,
};

// --- Runtime re-exports ----------------------------------------------------

pub use xcon_runtime::{
    ChannelLogger, ConfigError, Console, ConsoleConfig, ConsoleMsg, InputEvent, KeyCode,
    KeyEvent, KeyEventKind, LogEvent, Logger, Modifiers, ScrollRepeatConfig, ShutdownError,
    SubmitError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for console hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while drawing or starting worker threads.
    Io(std::io::Error),
    Config(ConfigError),
    Registry(RegistryError),
    Submit(SubmitError),
    Shutdown(ShutdownError),
    Clipboard(ClipboardError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Submit(err) => write!(f, "{err}"),
            Self::Shutdown(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Submit(err) => Some(err),
            Self::Shutdown(err) => Some(err),
            Self::Clipboard(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<SubmitError> for Error {
    fn from(err: SubmitError) -> Self {
        Self::Submit(err)
    }
}

impl From<ShutdownError> for Error {
    fn from(err: ShutdownError) -> Self {
        Self::Shutdown(err)
    }
}

impl From<ClipboardError> for Error {
    fn from(err: ClipboardError) -> Self {
        Self::Clipboard(err)
    }
}

/// Standard result type for xcon APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Accessor, Clipboard, CommandEntry, CommandFlags, Console, ConsoleConfig, Error,
        InputEvent, KeyCode, KeyEvent, LogSink, Logger, Modifiers, Rect, Result, Rgb, Surface,
        kinds,
    };

    pub use crate::{commands, core, render, runtime, text};
}

pub use xcon_commands as commands;
pub use xcon_core as core;
pub use xcon_render as render;
pub use xcon_runtime as runtime;
pub use xcon_text as text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_display() {
        let err: Error = SubmitError::ShutDown.into();
        assert_eq!(err.to_string(), "command processor is shut down");
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = std::io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn prelude_builds_a_console() {
        use crate::prelude::*;
        let mut console = Console::new(ConsoleConfig::default()).unwrap();
        console
            .add_command(kinds::function("noop", "does nothing", || {}))
            .unwrap();
        assert!(console.registry().read().unwrap().contains("noop"));
        console.shutdown().unwrap();
    }
}
