#![forbid(unsafe_code)]

//! Command registry, completion trie, and command-line dispatch.

pub mod args;
pub mod dispatch;
pub mod entry;
pub mod flags;
pub mod kinds;
pub mod registry;
pub mod trie;

pub use dispatch::{CommandDispatcher, DispatchOutcome, LinePrefixes};
pub use entry::{Accessor, CommandContext, CommandEntry, CommandError};
pub use flags::CommandFlags;
pub use registry::{CommandRegistry, RegistryError};
pub use trie::CommandTrie;
