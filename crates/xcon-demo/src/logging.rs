#![forbid(unsafe_code)]

//! Diagnostic output for the demo.
//!
//! The terminal is owned by the console, so diagnostics go to a file.
//! `XCON_LOG` holds the filter directives; the default is `info`.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const FILTER_ENV: &str = "XCON_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the subscriber writing to `file`.
pub fn build_subscriber(file: File) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));
    tracing_subscriber::registry().with(fmt_layer).with(filter())
}

/// Install the global subscriber. Fails if the file cannot be created or a
/// subscriber is already installed.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing::subscriber::set_global_default(build_subscriber(file)).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn events_reach_the_file() {
        let path = std::env::temp_dir().join(format!("xcon-demo-log-{}.log", std::process::id()));
        let file = File::create(&path).unwrap();
        let subscriber = build_subscriber(file);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(lines = 3, "console ready");
        });
        let mut text = String::new();
        File::open(&path).unwrap().read_to_string(&mut text).unwrap();
        assert!(text.contains("console ready"));
        let _ = std::fs::remove_file(&path);
    }
}
