//! Log output setup.
//!
//! Logs go to stderr so table and JSON output on stdout stays clean.
//! `-v` flags win over the configured level; `RUST_LOG` is honoured when
//! neither is usable.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LoggingConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Console,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn from_config(config: &LoggingConfig) -> Self {
        match config.format.as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Console,
        }
    }
}

/// Level directive for a `-v` count, falling back to `configured`.
pub fn level_for(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
pub fn init(verbose: u8, config: &LoggingConfig) -> Result<()> {
    let level = level_for(verbose, &config.level);
    let filter = EnvFilter::try_new(&level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = match LogFormat::from_config(config) {
        LogFormat::Console => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose >= 2)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config() {
        assert_eq!(level_for(0, "error"), "error");
        assert_eq!(level_for(1, "error"), "info");
        assert_eq!(level_for(2, "warn"), "debug");
        assert_eq!(level_for(5, "warn"), "trace");
    }

    #[test]
    fn test_format_from_config() {
        let mut config = LoggingConfig::default();
        assert_eq!(LogFormat::from_config(&config), LogFormat::Console);
        config.format = "json".into();
        assert_eq!(LogFormat::from_config(&config), LogFormat::Json);
    }
}
