#![forbid(unsafe_code)]

//! Single-line text editing for the console command line.

pub mod clipboard;
pub mod editor;
pub mod word;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use editor::{EditMode, LineEditor, Selection};
pub use word::{Direction, is_separator};
