#![forbid(unsafe_code)]

//! Command capability flags.

use bitflags::bitflags;

bitflags! {
    /// What a command is and how it accepts arguments.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u8 {
        /// Command may be executed.
        const ENABLED       = 0b0_0001;
        /// Command refuses to run without arguments.
        const ARGS_REQUIRED = 0b0_0010;
        /// Command runs with or without arguments.
        const ARGS_OPTIONAL = 0b0_0100;
        /// Command performs an action.
        const FUNCTION      = 0b0_1000;
        /// Command reads or writes a value; no arguments prints its status.
        const VARIABLE      = 0b1_0000;
    }
}

impl Default for CommandFlags {
    fn default() -> Self {
        Self::ENABLED | Self::FUNCTION
    }
}

impl CommandFlags {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self.contains(Self::ENABLED)
    }

    #[must_use]
    pub fn is_variable(self) -> bool {
        self.contains(Self::VARIABLE)
    }
}
