#![forbid(unsafe_code)]

//! Console runtime: input handling, command execution thread, repeat
//! scrolling, and the owning [`Console`] engine.

pub mod command_queue;
pub mod config;
pub mod console;
pub mod input;
pub mod logger;
pub mod repeat_scroll;
mod signal;

pub use command_queue::{CommandProcessor, ShutdownError, SubmitError};
pub use config::{ConfigError, ConsoleConfig};
pub use console::{Console, ConsoleMsg};
pub use input::{InputEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use logger::{ChannelLogger, LogEvent, Logger};
pub use repeat_scroll::{
    AccelerationSchedule, AccelerationTable, RepeatScrollController, RepeatState, RepeatTick,
    RepeatTimer, ScrollDirection, ScrollRepeatConfig, ScrollTarget, ThreadRepeatTimer,
};
