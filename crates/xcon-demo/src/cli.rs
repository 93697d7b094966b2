#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Arguments are parsed by hand. `XCON_DEMO_*` environment variables
//! provide defaults that explicit flags override.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
xcon demo: an interactive console in the terminal

USAGE:
    xcon-demo [OPTIONS]

OPTIONS:
    --log-file=PATH      Write diagnostics to PATH (default: xcon-demo.log)
    --no-mouse           Disable mouse wheel capture
    --exit-after=MS      Quit after MS milliseconds
    --help, -h           Show this help message
    --version, -V        Show version

KEYS:
    Enter                Run the command line
    Tab / Shift-Tab      Complete command name
    Up / Down            Command history
    PageUp / PageDown    Scroll the log (hold to accelerate)
    Ctrl+A/C/X/V         Select all, copy, cut, paste
    Insert               Toggle overwrite mode
    Esc                  Quit

ENVIRONMENT VARIABLES:
    XCON_LOG                  Diagnostic filter (e.g. debug, xcon_runtime=trace)
    XCON_DEMO_LOG_FILE        Override --log-file
    XCON_DEMO_EXIT_AFTER_MS   Override --exit-after
    XCON_*                    Console settings, see ConsoleConfig";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub log_file: String,
    pub mouse: bool,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            log_file: "xcon-demo.log".into(),
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

/// What the arguments asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
    Invalid(String),
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or a malformed flag.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Parsed::Run(opts) => opts,
            Parsed::Help => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Parsed::Version => {
                println!("xcon-demo {VERSION}");
                process::exit(0);
            }
            Parsed::Invalid(msg) => {
                eprintln!("{msg}\n\n{HELP_TEXT}");
                process::exit(2);
            }
        }
    }

    pub fn parse_from<F>(args: &[String], get_env: F) -> Parsed
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if let Some(path) = get_env("XCON_DEMO_LOG_FILE") {
            opts.log_file = path;
        }
        if let Some(val) = get_env("XCON_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Parsed::Help,
                "--version" | "-V" => return Parsed::Version,
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(path) = other.strip_prefix("--log-file=") {
                        opts.log_file = path.to_owned();
                    } else if let Some(val) = other.strip_prefix("--exit-after=") {
                        match val.parse() {
                            Ok(n) => opts.exit_after_ms = n,
                            Err(_) => {
                                return Parsed::Invalid(format!(
                                    "Invalid --exit-after value: {val}"
                                ));
                            }
                        }
                    } else {
                        return Parsed::Invalid(format!("Unknown argument: {other}"));
                    }
                }
            }
        }
        Parsed::Run(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn defaults_without_args() {
        assert_eq!(Opts::parse_from(&[], |_| None), Parsed::Run(Opts::default()));
    }

    #[test]
    fn flags_override_env() {
        let parsed = Opts::parse_from(
            &args(&["--exit-after=500", "--no-mouse"]),
            |key| (key == "XCON_DEMO_EXIT_AFTER_MS").then(|| "100".to_owned()),
        );
        let Parsed::Run(opts) = parsed else {
            panic!("expected run, got {parsed:?}");
        };
        assert_eq!(opts.exit_after_ms, 500);
        assert!(!opts.mouse);
    }

    #[test]
    fn env_sets_log_file() {
        let parsed = Opts::parse_from(&[], |key| {
            (key == "XCON_DEMO_LOG_FILE").then(|| "/tmp/x.log".to_owned())
        });
        assert!(matches!(parsed, Parsed::Run(o) if o.log_file == "/tmp/x.log"));
    }

    #[test]
    fn help_version_and_errors() {
        assert_eq!(Opts::parse_from(&args(&["-h"]), |_| None), Parsed::Help);
        assert_eq!(Opts::parse_from(&args(&["--version"]), |_| None), Parsed::Version);
        assert!(matches!(
            Opts::parse_from(&args(&["--exit-after=soon"]), |_| None),
            Parsed::Invalid(_)
        ));
        assert!(matches!(
            Opts::parse_from(&args(&["--bogus"]), |_| None),
            Parsed::Invalid(_)
        ));
    }

    #[test]
    fn help_mentions_env_overrides() {
        assert!(HELP_TEXT.contains("XCON_DEMO_LOG_FILE"));
        assert!(HELP_TEXT.contains("XCON_LOG"));
    }
}
