#![forbid(unsafe_code)]

//! Ready-made command kinds: plain functions and typed variables.
//!
//! Variables print their value when called without arguments and assign it
//! otherwise. Typed functions require an argument and pass the parsed value
//! to a callback.

use crate::args::{first_arg, format_bool, format_float, parse_bool, parse_float, parse_int};
use crate::entry::{Accessor, CommandEntry, CommandError};
use crate::flags::CommandFlags;

const BOOL_ARGS: &str = "'on/off' or '1/0'";

fn int_args(min: i32, max: i32) -> String {
    format!("integer value in range [{min},{max}]")
}

fn float_args(min: f32, max: f32) -> String {
    format!(
        "float value in range [{},{}]",
        format_float(min),
        format_float(max)
    )
}

fn string_args(max_len: usize) -> String {
    format!("string up to {max_len} characters")
}

fn variable_flags() -> CommandFlags {
    CommandFlags::ENABLED | CommandFlags::VARIABLE
}

fn function_with_args_flags() -> CommandFlags {
    CommandFlags::ENABLED | CommandFlags::FUNCTION | CommandFlags::ARGS_REQUIRED
}

fn bool_arg(args: &str) -> Result<bool, CommandError> {
    first_arg(args)
        .and_then(parse_bool)
        .ok_or(CommandError::InvalidSyntax)
}

fn int_arg(args: &str, min: i32, max: i32) -> Result<i32, CommandError> {
    first_arg(args)
        .and_then(parse_int)
        .filter(|v| (min..=max).contains(v))
        .ok_or(CommandError::InvalidSyntax)
}

fn float_arg(args: &str, min: f32, max: f32) -> Result<f32, CommandError> {
    first_arg(args)
        .and_then(parse_float)
        .filter(|v| (min..=max).contains(v))
        .ok_or(CommandError::InvalidSyntax)
}

fn truncate(args: &str, max_len: usize) -> String {
    args.chars().take(max_len).collect()
}

/// Command that ignores its arguments and runs `action`.
pub fn function<F>(name: &str, info: &str, action: F) -> CommandEntry
where
    F: Fn() + Send + Sync + 'static,
{
    CommandEntry::new(name, move |_, _| {
        action();
        Ok(())
    })
    .with_info(info)
}

pub fn bool_var(name: &str, info: &str, target: Accessor<bool>) -> CommandEntry {
    let status = target.clone();
    CommandEntry::new(name, move |_, args| {
        target.set(bool_arg(args)?);
        Ok(())
    })
    .with_flags(variable_flags())
    .with_args(BOOL_ARGS)
    .with_info(info)
    .with_status(move || format_bool(status.get()).to_owned())
}

pub fn int_var(name: &str, info: &str, target: Accessor<i32>, min: i32, max: i32) -> CommandEntry {
    let status = target.clone();
    CommandEntry::new(name, move |_, args| {
        target.set(int_arg(args, min, max)?);
        Ok(())
    })
    .with_flags(variable_flags())
    .with_args(int_args(min, max))
    .with_info(info)
    .with_status(move || status.get().to_string())
}

pub fn float_var(
    name: &str,
    info: &str,
    target: Accessor<f32>,
    min: f32,
    max: f32,
) -> CommandEntry {
    let status = target.clone();
    CommandEntry::new(name, move |_, args| {
        target.set(float_arg(args, min, max)?);
        Ok(())
    })
    .with_flags(variable_flags())
    .with_args(float_args(min, max))
    .with_info(info)
    .with_status(move || format_float(status.get()))
}

/// String variable; longer values are truncated to `max_len` characters.
pub fn string_var(name: &str, info: &str, target: Accessor<String>, max_len: usize) -> CommandEntry {
    let status = target.clone();
    CommandEntry::new(name, move |_, args| {
        target.set(truncate(args, max_len));
        Ok(())
    })
    .with_flags(variable_flags())
    .with_args(string_args(max_len))
    .with_info(info)
    .with_status(move || status.get())
}

pub fn bool_func<F>(name: &str, info: &str, action: F) -> CommandEntry
where
    F: Fn(bool) + Send + Sync + 'static,
{
    CommandEntry::new(name, move |_, args| {
        action(bool_arg(args)?);
        Ok(())
    })
    .with_flags(function_with_args_flags())
    .with_args(BOOL_ARGS)
    .with_info(info)
}

pub fn int_func<F>(name: &str, info: &str, min: i32, max: i32, action: F) -> CommandEntry
where
    F: Fn(i32) + Send + Sync + 'static,
{
    CommandEntry::new(name, move |_, args| {
        action(int_arg(args, min, max)?);
        Ok(())
    })
    .with_flags(function_with_args_flags())
    .with_args(int_args(min, max))
    .with_info(info)
}

pub fn float_func<F>(name: &str, info: &str, min: f32, max: f32, action: F) -> CommandEntry
where
    F: Fn(f32) + Send + Sync + 'static,
{
    CommandEntry::new(name, move |_, args| {
        action(float_arg(args, min, max)?);
        Ok(())
    })
    .with_flags(function_with_args_flags())
    .with_args(float_args(min, max))
    .with_info(info)
}

pub fn string_func<F>(name: &str, info: &str, max_len: usize, action: F) -> CommandEntry
where
    F: Fn(&str) + Send + Sync + 'static,
{
    CommandEntry::new(name, move |_, args| {
        action(&truncate(args, max_len));
        Ok(())
    })
    .with_flags(function_with_args_flags())
    .with_args(string_args(max_len))
    .with_info(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::LinePrefixes;
    use crate::registry::CommandRegistry;
    use std::sync::{Arc, Mutex};
    use xcon_core::LogSink;

    struct Discard;

    impl LogSink for Discard {
        fn log(&self, _line: &str) {}
    }

    fn run(entry: &CommandEntry, args: &str) -> Result<(), CommandError> {
        let registry = CommandRegistry::new();
        let prefixes = LinePrefixes::default();
        let ctx = crate::entry::CommandContext::new(&registry, &Discard, &prefixes);
        entry.execute(&ctx, args)
    }

    #[test]
    fn bool_var_parses_and_reports() {
        let value = Arc::new(Mutex::new(false));
        let entry = bool_var("vsync", "", Accessor::shared(Arc::clone(&value)));
        assert_eq!(entry.args(), "'on/off' or '1/0'");
        assert_eq!(entry.status().as_deref(), Some("0"));
        run(&entry, "on").unwrap();
        assert!(*value.lock().unwrap());
        assert_eq!(entry.status().as_deref(), Some("1"));
        assert_eq!(run(&entry, "maybe"), Err(CommandError::InvalidSyntax));
        assert!(entry.flags().is_variable());
    }

    #[test]
    fn int_var_rejects_out_of_range() {
        let value = Arc::new(Mutex::new(5));
        let entry = int_var("fov", "", Accessor::shared(Arc::clone(&value)), 1, 10);
        assert_eq!(entry.args(), "integer value in range [1,10]");
        assert_eq!(run(&entry, "11"), Err(CommandError::InvalidSyntax));
        assert_eq!(run(&entry, "x"), Err(CommandError::InvalidSyntax));
        run(&entry, "10 extra").unwrap();
        assert_eq!(*value.lock().unwrap(), 10);
    }

    #[test]
    fn float_var_formats_range() {
        let value = Arc::new(Mutex::new(0.5));
        let entry = float_var("gamma", "", Accessor::shared(Arc::clone(&value)), 0.0, 2.0);
        assert_eq!(entry.args(), "float value in range [0.000,2.000]");
        assert_eq!(entry.status().as_deref(), Some("0.500"));
        run(&entry, "1.25").unwrap();
        assert_eq!(entry.status().as_deref(), Some("1.250"));
    }

    #[test]
    fn string_var_truncates() {
        let value = Arc::new(Mutex::new(String::new()));
        let entry = string_var("name", "", Accessor::shared(Arc::clone(&value)), 4);
        run(&entry, "abcdef").unwrap();
        assert_eq!(*value.lock().unwrap(), "abcd");
    }

    #[test]
    fn typed_functions_require_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let entry = int_func("jump", "", 0, 3, move |v| sink.lock().unwrap().push(v));
        assert!(entry.flags().contains(CommandFlags::ARGS_REQUIRED));
        run(&entry, "2").unwrap();
        assert_eq!(run(&entry, "4"), Err(CommandError::InvalidSyntax));
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn plain_function_ignores_args() {
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let entry = function("flush", "flush caches", move || *counter.lock().unwrap() += 1);
        run(&entry, "whatever").unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(entry.status(), None);
    }
}
