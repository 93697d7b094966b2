#![forbid(unsafe_code)]

//! Command-line execution against a shared registry.
//!
//! [`CommandDispatcher::execute`] echoes the line, resolves the command, and
//! reports problems (unknown, disabled, bad arguments) as prefixed output
//! lines. The prefix of a line selects its colour when rendered.

use std::sync::{Arc, RwLock};

use xcon_core::LogSink;

use crate::args::{first_arg, split_command};
use crate::entry::{CommandContext, CommandEntry, CommandError};
use crate::flags::CommandFlags;
use crate::registry::CommandRegistry;

/// Output-line prefixes for each kind of dispatcher message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePrefixes {
    pub command_input: String,
    pub unknown_command: String,
    pub disabled_command: String,
    pub command_listing: String,
    pub command_status: String,
    pub invalid_syntax: String,
}

impl Default for LinePrefixes {
    fn default() -> Self {
        Self {
            command_input: "@ ".into(),
            unknown_command: "! ".into(),
            disabled_command: "! ".into(),
            command_listing: "- ".into(),
            command_status: "- ".into(),
            invalid_syntax: "~ ".into(),
        }
    }
}

/// What happened to a dispatched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Line was blank; nothing was logged.
    Blank,
    Executed,
    Unknown,
    Disabled,
    /// Variable called without arguments; its status was printed.
    StatusShown,
    InvalidSyntax,
}

/// Runs command lines against a registry, writing output to a sink.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<RwLock<CommandRegistry>>,
    sink: Arc<dyn LogSink>,
    prefixes: LinePrefixes,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<RwLock<CommandRegistry>>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            registry,
            sink,
            prefixes: LinePrefixes::default(),
        }
    }

    #[must_use]
    pub fn with_prefixes(mut self, prefixes: LinePrefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<RwLock<CommandRegistry>> {
        &self.registry
    }

    #[must_use]
    pub fn prefixes(&self) -> &LinePrefixes {
        &self.prefixes
    }

    fn say(&self, prefix: &str, text: &str) {
        self.sink.log(&format!("{prefix}{text}"));
    }

    /// Echo and execute one command line.
    ///
    /// The registry is read-locked while the handler runs.
    pub fn execute(&self, line: &str) -> DispatchOutcome {
        let line = line.trim();
        if line.is_empty() {
            return DispatchOutcome::Blank;
        }
        let p = &self.prefixes;
        self.say(&p.command_input, line);

        let (name, args) = split_command(line);
        let registry = self.registry.read().unwrap();
        let Some(entry) = registry.find(name) else {
            self.say(&p.unknown_command, &format!("Unknown command: {name}"));
            tracing::debug!(command = name, "unknown command");
            return DispatchOutcome::Unknown;
        };
        let flags = entry.flags();
        if !flags.is_enabled() {
            self.say(&p.disabled_command, "Command disabled.");
            return DispatchOutcome::Disabled;
        }
        if args.is_empty() {
            if flags.is_variable() {
                let status = entry.status().unwrap_or_default();
                self.say(&p.command_status, &format!("{name} {status}"));
                return DispatchOutcome::StatusShown;
            }
            if flags.contains(CommandFlags::ARGS_REQUIRED) {
                self.report_invalid_syntax(entry);
                return DispatchOutcome::InvalidSyntax;
            }
        }

        let ctx = CommandContext::new(&registry, &*self.sink, p);
        tracing::debug!(command = name, args, "executing command");
        match entry.execute(&ctx, args) {
            Ok(()) => DispatchOutcome::Executed,
            Err(CommandError::InvalidSyntax) => {
                self.report_invalid_syntax(entry);
                DispatchOutcome::InvalidSyntax
            }
        }
    }

    fn report_invalid_syntax(&self, entry: &CommandEntry) {
        let p = &self.prefixes.invalid_syntax;
        self.say(p, &format!("Invalid syntax in call to '{}'", entry.name()));
        self.say(p, &format!("Valid arguments: {}", entry.args()));
    }
}

/// One-line description used by `help`.
#[must_use]
pub fn describe(entry: &CommandEntry) -> String {
    let status = entry
        .status()
        .map(|s| format!("( {s} )  "))
        .unwrap_or_default();
    format!("{}  {status}<{}> {}", entry.name(), entry.args(), entry.info())
}

/// Built-in `help [command]`.
#[must_use]
pub fn help_command() -> CommandEntry {
    CommandEntry::new("help", |ctx, args| {
        let p = ctx.prefixes();
        if let Some(name) = first_arg(args) {
            match ctx.registry().find(name) {
                Some(entry) => ctx.log(&describe(entry)),
                None => ctx.log(&format!("{}Unknown command: {name}", p.unknown_command)),
            }
            return Ok(());
        }
        ctx.log(&format!("{}--- Command listing start ---", p.command_listing));
        for entry in ctx.registry().iter() {
            ctx.log(&describe(entry));
        }
        ctx.log(&format!("{}--- Command listing end ---", p.command_listing));
        Ok(())
    })
    .with_flags(CommandFlags::ENABLED | CommandFlags::FUNCTION | CommandFlags::ARGS_OPTIONAL)
    .with_args("string up to 255 characters")
    .with_info("display help information")
}
