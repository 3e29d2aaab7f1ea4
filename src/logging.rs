//! Structured logging setup.
//!
//! Logs go to stderr so that reports and previews on stdout stay machine
//! readable. Configuration comes from the environment:
//!
//! | Variable                        | Values                 | Default  |
//! |---------------------------------|------------------------|----------|
//! | `ENFORCER_LOG_LEVEL`            | trace/debug/info/warn/error | `info` |
//! | `ENFORCER_LOG_FORMAT`           | `json` / `pretty`      | `pretty` |
//! | `ENFORCER_LOG_TARGET_FILTER`    | comma-separated directives | none |
//! | `ENFORCER_LOG_INCLUDE_LOCATION` | `true` / `false`       | `false`  |
//!
//! `RUST_LOG`, when set, replaces the level-derived filter.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for pipelines, pretty-print for terminals
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

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from `ENFORCER_LOG_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LogConfig::default();
        Self {
            log_level: lookup("ENFORCER_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("ENFORCER_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("ENFORCER_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("ENFORCER_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
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
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_defaults_without_environment() {
        assert_eq!(LogConfig::from_lookup(lookup(&[])), LogConfig::default());
    }

    #[test]
    fn test_values_from_environment() {
        let config = LogConfig::from_lookup(lookup(&[
            ("ENFORCER_LOG_LEVEL", "debug"),
            ("ENFORCER_LOG_FORMAT", "json"),
            ("ENFORCER_LOG_TARGET_FILTER", "contract_enforcer::diff=trace"),
            ("ENFORCER_LOG_INCLUDE_LOCATION", "true"),
        ]));
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.target_filter.as_deref(),
            Some("contract_enforcer::diff=trace")
        );
        assert!(config.include_location);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = LogConfig::from_lookup(lookup(&[
            ("ENFORCER_LOG_LEVEL", "loud"),
            ("ENFORCER_LOG_INCLUDE_LOCATION", "maybe"),
            ("ENFORCER_LOG_TARGET_FILTER", "  "),
        ]));
        assert_eq!(config.level(), Level::INFO);
        assert!(!config.include_location);
        assert!(config.target_filter.is_none());
    }
}
