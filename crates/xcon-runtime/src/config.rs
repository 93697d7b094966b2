#![forbid(unsafe_code)]

//! Console configuration.
//!
//! Defaults suit an interactive in-game console. Every numeric setting can
//! be overridden from the environment:
//!
//! | Variable                   | Field                        |
//! |----------------------------|------------------------------|
//! | `XCON_LOG_CAPACITY`        | `log_capacity`               |
//! | `XCON_HISTORY_CAPACITY`    | `history_capacity`           |
//! | `XCON_QUEUE_CAPACITY`      | `queue_capacity`             |
//! | `XCON_SHUTDOWN_TIMEOUT_MS` | `shutdown_timeout`           |
//! | `XCON_WHEEL_LINES`         | `wheel_lines`                |
//! | `XCON_PAGE_STEP`           | `page_step`                  |
//! | `XCON_PROMPT`              | `prompt`                     |
//! | `XCON_REPEAT_INITIAL_MS`   | `scroll_repeat.initial`      |
//! | `XCON_REPEAT_MIN_MS`       | `scroll_repeat.min`          |
//! | `XCON_REPEAT_ACCEL_MS`     | `scroll_repeat.accel_step`   |

use std::env;
use std::fmt;
use std::time::Duration;

use xcon_commands::LinePrefixes;
use xcon_core::history::DEFAULT_HISTORY_CAPACITY;
use xcon_render::scroll::DEFAULT_LOG_CAPACITY;

use crate::command_queue::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT};
use crate::repeat_scroll::ScrollRepeatConfig;

const ENV_LOG_CAPACITY: &str = "XCON_LOG_CAPACITY";
const ENV_HISTORY_CAPACITY: &str = "XCON_HISTORY_CAPACITY";
const ENV_QUEUE_CAPACITY: &str = "XCON_QUEUE_CAPACITY";
const ENV_SHUTDOWN_TIMEOUT_MS: &str = "XCON_SHUTDOWN_TIMEOUT_MS";
const ENV_WHEEL_LINES: &str = "XCON_WHEEL_LINES";
const ENV_PAGE_STEP: &str = "XCON_PAGE_STEP";
const ENV_PROMPT: &str = "XCON_PROMPT";
const ENV_REPEAT_INITIAL_MS: &str = "XCON_REPEAT_INITIAL_MS";
const ENV_REPEAT_MIN_MS: &str = "XCON_REPEAT_MIN_MS";
const ENV_REPEAT_ACCEL_MS: &str = "XCON_REPEAT_ACCEL_MS";

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub message: &'static str,
}

impl ConfigError {
    fn new(key: &'static str, value: impl Into<String>, message: &'static str) -> Self {
        Self {
            key,
            value: value.into(),
            message,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.key, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a [`Console`](crate::Console).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Lines kept in the scrollback.
    pub log_capacity: usize,
    /// Entries kept in the command history.
    pub history_capacity: usize,
    /// Commands that may wait for the worker at once.
    pub queue_capacity: usize,
    /// How long shutdown waits for a running command.
    pub shutdown_timeout: Duration,
    /// Lines per mouse-wheel notch.
    pub wheel_lines: usize,
    /// Lines per repeat-scroll step.
    pub page_step: usize,
    pub prompt: String,
    /// Draw the `[newest/total]` counter on the input row.
    pub show_counter: bool,
    pub prefixes: LinePrefixes,
    pub scroll_repeat: ScrollRepeatConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            wheel_lines: 3,
            page_step: 1,
            prompt: ">>> ".into(),
            show_counter: true,
            prefixes: LinePrefixes::default(),
            scroll_repeat: ScrollRepeatConfig::default(),
        }
    }
}

impl ConsoleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `XCON_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults with overrides from `get`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_usize(&get, ENV_LOG_CAPACITY)? {
            config.log_capacity = v;
        }
        if let Some(v) = parse_usize(&get, ENV_HISTORY_CAPACITY)? {
            config.history_capacity = v;
        }
        if let Some(v) = parse_usize(&get, ENV_QUEUE_CAPACITY)? {
            config.queue_capacity = v;
        }
        if let Some(v) = parse_millis(&get, ENV_SHUTDOWN_TIMEOUT_MS)? {
            config.shutdown_timeout = v;
        }
        if let Some(v) = parse_usize(&get, ENV_WHEEL_LINES)? {
            config.wheel_lines = v;
        }
        if let Some(v) = parse_usize(&get, ENV_PAGE_STEP)? {
            config.page_step = v;
        }
        if let Some(prompt) = get(ENV_PROMPT) {
            config.prompt = prompt;
        }
        if let Some(v) = parse_millis(&get, ENV_REPEAT_INITIAL_MS)? {
            config.scroll_repeat.initial = v;
        }
        if let Some(v) = parse_millis(&get, ENV_REPEAT_MIN_MS)? {
            config.scroll_repeat.min = v;
        }
        if let Some(v) = parse_millis(&get, ENV_REPEAT_ACCEL_MS)? {
            config.scroll_repeat.accel_step = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::new(ENV_QUEUE_CAPACITY, "0", "must be positive"));
        }
        if self.page_step == 0 {
            return Err(ConfigError::new(ENV_PAGE_STEP, "0", "must be positive"));
        }
        let repeat = &self.scroll_repeat;
        if repeat.min.is_zero() {
            return Err(ConfigError::new(ENV_REPEAT_MIN_MS, "0", "must be positive"));
        }
        if repeat.initial < repeat.min {
            return Err(ConfigError::new(
                ENV_REPEAT_INITIAL_MS,
                repeat.initial.as_millis().to_string(),
                "must not be below the minimum interval",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_wheel_lines(mut self, lines: usize) -> Self {
        self.wheel_lines = lines;
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_prefixes(mut self, prefixes: LinePrefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn with_scroll_repeat(mut self, repeat: ScrollRepeatConfig) -> Self {
        self.scroll_repeat = repeat;
        self
    }

    #[must_use]
    pub fn with_counter(mut self, show: bool) -> Self {
        self.show_counter = show;
        self
    }
}

fn parse_usize<F>(get: &F, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = get(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::new(key, value, "expected a non-negative integer"))
}

fn parse_millis<F>(get: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = get(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::new(key, value, "expected milliseconds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = ConsoleConfig::default();
        assert_eq!(c.log_capacity, 256);
        assert_eq!(c.history_capacity, 64);
        assert_eq!(c.queue_capacity, 16);
        assert_eq!(c.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(c.wheel_lines, 3);
        assert_eq!(c.page_step, 1);
        assert_eq!(c.prompt, ">>> ");
        assert_eq!(c.scroll_repeat.initial, Duration::from_millis(200));
        assert_eq!(c.scroll_repeat.min, Duration::from_millis(5));
        assert_eq!(c.scroll_repeat.accel_step, Duration::from_millis(1));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(
            ConsoleConfig::from_lookup(|_| None).unwrap(),
            ConsoleConfig::default()
        );
    }

    #[test]
    fn overrides_apply() {
        let c = ConsoleConfig::from_lookup(lookup(&[
            ("XCON_LOG_CAPACITY", "1024"),
            ("XCON_HISTORY_CAPACITY", " 8 "),
            ("XCON_SHUTDOWN_TIMEOUT_MS", "250"),
            ("XCON_PROMPT", "$ "),
            ("XCON_REPEAT_INITIAL_MS", "300"),
            ("XCON_REPEAT_MIN_MS", "10"),
        ]))
        .unwrap();
        assert_eq!(c.log_capacity, 1024);
        assert_eq!(c.history_capacity, 8);
        assert_eq!(c.shutdown_timeout, Duration::from_millis(250));
        assert_eq!(c.prompt, "$ ");
        assert_eq!(c.scroll_repeat.initial, Duration::from_millis(300));
        assert_eq!(c.scroll_repeat.min, Duration::from_millis(10));
        assert_eq!(c.queue_capacity, 16);
    }

    #[test]
    fn malformed_value_is_reported() {
        let err = ConsoleConfig::from_lookup(lookup(&[("XCON_WHEEL_LINES", "three")])).unwrap_err();
        assert_eq!(err.key, "XCON_WHEEL_LINES");
        assert_eq!(err.value, "three");
        assert_eq!(
            err.to_string(),
            "XCON_WHEEL_LINES=three (expected a non-negative integer)"
        );
    }

    #[test]
    fn inconsistent_values_are_rejected() {
        assert!(ConsoleConfig::from_lookup(lookup(&[("XCON_QUEUE_CAPACITY", "0")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("XCON_REPEAT_MIN_MS", "0")])).is_err());
        let err = ConsoleConfig::from_lookup(lookup(&[("XCON_REPEAT_INITIAL_MS", "2")]))
            .unwrap_err();
        assert_eq!(err.key, "XCON_REPEAT_INITIAL_MS");
    }

    #[test]
    fn builders_chain() {
        let c = ConsoleConfig::new()
            .with_log_capacity(10)
            .with_queue_capacity(2)
            .with_prompt("] ")
            .with_counter(false);
        assert_eq!(c.log_capacity, 10);
        assert_eq!(c.queue_capacity, 2);
        assert_eq!(c.prompt, "] ");
        assert!(!c.show_counter);
    }
}
