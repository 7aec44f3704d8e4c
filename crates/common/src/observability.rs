//! Logging initialization for the RcodeZero tooling
//!
//! Output format is selected by `RCODEZERO_LOG_FORMAT` (`pretty` or `json`,
//! default `pretty`); the level comes from `RUST_LOG` and falls back to the
//! level the caller passes in.

use anyhow::{anyhow, Result};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "RCODEZERO_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable output for terminals
    #[default]
    Pretty,
    /// Structured JSON, one event per line
    Json,
}

impl LogFormat {
    /// Parse a format name, falling back to pretty output for unknown names
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    /// Read the format from `RCODEZERO_LOG_FORMAT`
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::from_str_loose(&v))
            .unwrap_or_default()
    }
}

/// Initialize the tracing/logging subsystem
///
/// `default_level` is used when `RUST_LOG` is unset or invalid. Logs go to
/// stderr so command output on stdout stays machine readable.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let format = LogFormat::from_env();

    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
    });

    let pretty_layer = (format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
    });

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

    debug!(format = ?format, "Tracing initialized");
    Ok(())
}
