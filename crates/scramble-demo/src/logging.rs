#![forbid(unsafe_code)]

//! Tracing setup for the demo.
//!
//! The demo owns the terminal, so logs never go to stdout or stderr. With a
//! log path they are appended to that file; without one no subscriber is
//! installed and every `tracing` call is a no-op.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::settings::DemoError;

/// Environment variable holding filter directives, e.g. `scramble_text=trace`.
pub const LOG_LEVEL_ENV: &str = "SCRAMBLE_DEMO_LOG_LEVEL";

/// Filter from [`LOG_LEVEL_ENV`], defaulting to `info`.
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a file-backed subscriber. Returns `false` when `path` is `None`.
pub fn init(path: Option<&Path>) -> Result<bool, DemoError> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| DemoError::Logging(err.to_string()))?;
    tracing::info!(path = %path.display(), "logging initialised");
    Ok(true)
}
