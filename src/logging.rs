//! Logging setup for `bugbook`.
//!
//! `RUST_LOG` always wins. Without it the level follows the CLI flags:
//! `-q` errors only, default warnings, `-v` info, `-vv` debug, `-vvv` trace.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Level name for the given verbosity flags.
#[must_use]
pub const fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Output goes to stderr, or is appended to
/// `log_file` when given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbose, quiet)))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Route logs through the test harness's captured output. Safe to call
/// from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().compact().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0, false), "warn");
        assert_eq!(default_level(1, false), "info");
        assert_eq!(default_level(2, false), "debug");
        assert_eq!(default_level(9, false), "trace");
        assert_eq!(default_level(3, true), "error");
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still fine");
    }
}
