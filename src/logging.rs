//! Structured logging setup.
//!
//! Generation reports recoverable problems (circular references, skipped
//! response codes, unknown stream events) as `tracing` warnings. This module
//! installs the subscriber that prints them.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - full filter directive, wins over everything else
//! - `OAS_MOCKGEN_LOG_LEVEL` - trace/debug/info/warn/error (default: info)
//! - `OAS_MOCKGEN_LOG_FORMAT` - pretty/json (default: pretty)
//! - `OAS_MOCKGEN_LOG_TARGET_FILTER` - extra comma-separated directives

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Pretty output for terminals, JSON for CI log collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line in each event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("OAS_MOCKGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("OAS_MOCKGEN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            target_filter: env::var("OAS_MOCKGEN_LOG_TARGET_FILTER").ok(),
            include_location: env::var("OAS_MOCKGEN_LOG_INCLUDE_LOCATION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Same as [`LogConfig::from_env`] but with `verbose` forcing debug level
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }
}

fn parse_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let level = parse_level(&config.log_level);
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
            }
        }
    }
    env_filter
}

/// Install the global subscriber. Logs go to stderr so generated output and
/// `inspect`/`select` results on stdout stay machine-readable.
///
/// # Errors
///
/// Fails if a global subscriber is already installed; callers that may run
/// twice (tests) should ignore the error.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }

    #[test]
    fn test_verbosity_override() {
        let config = LogConfig::default().with_verbosity(true);
        assert_eq!(config.log_level, "debug");
        let config = LogConfig::default().with_verbosity(false);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let config = LogConfig::default();
        let _first = init_logging_with_config(&config);
        assert!(init_logging_with_config(&config).is_err());
    }
}
