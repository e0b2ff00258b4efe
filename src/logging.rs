// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the CLI.
//
// Logs go to stderr so stdout stays clean for the Markdown or JSON the user
// asked for (handy when piping into a file). RUST_LOG, when set, wins over
// the --log-level flag.
// =============================================================================

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Verbosity accepted by --log-level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Installs the global subscriber. Call once, at the top of main.
pub fn init(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

// Our own crate logs at the chosen level; dependencies only speak up on warnings
fn default_directive(level: LogLevel) -> String {
    format!("warn,repo_scribe={}", level.as_directive())
}
