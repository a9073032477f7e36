//! Structured logging setup for linkpack
//!
//! This module provides initialization and configuration for structured logging using
//! the `tracing` ecosystem. Logs are always written to stderr so that stdout stays
//! reserved for command reports.
//!
//! # Features
//!
//! - Console output with pretty formatting (default)
//! - Optional JSON output for CI environments
//! - Environment-based configuration via `RUST_LOG`
//! - Thread-safe, can only be initialized once
//!
//! # Example
//!
//! ```no_run
//! use linkpack::util::logging;
//!
//! logging::init_from_env();
//!
//! use tracing::{debug, info};
//!
//! info!("Linking runtime");
//! debug!(archive = "app.jar", "Analyzing archive");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., linkpack::resolver) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread ID and name in logs
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    /// Defaults:
    /// - Level: INFO
    /// - JSON: false (pretty console output)
    /// - Target: false
    /// - Location: false
    /// - Thread IDs: false
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging configuration with the specified level
    ///
    /// ```
    /// use linkpack::util::LoggingConfig;
    /// use tracing::Level;
    ///
    /// let config = LoggingConfig::with_level(Level::DEBUG);
    /// assert_eq!(config.level, Level::DEBUG);
    /// ```
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Returns `Level::INFO` for unrecognised input.
///
/// ```
/// use linkpack::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the logging system with the provided configuration
///
/// Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("linkpack={}", config.level))
        };

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        }
    });
}

/// Initializes logging with default configuration
pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from environment variables
///
/// This reads configuration from:
/// - `LINKPACK_LOG_LEVEL` - Log level (trace, debug, info, warn, error)
/// - `LINKPACK_LOG_JSON` - Use JSON output (true/false)
/// - `RUST_LOG` - Standard Rust log filtering, overrides the level when set
pub fn init_from_env() {
    init_logging(config_from_env());
}

/// Builds the logging configuration described by the environment
pub fn config_from_env() -> LoggingConfig {
    let level_str = env::var("LINKPACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let level = parse_level(&level_str);

    let use_json = env::var("LINKPACK_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    LoggingConfig {
        level,
        use_json,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(!config.include_target);
        assert!(!config.include_location);
        assert!(!config.include_thread_ids);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("LINKPACK_LOG_LEVEL", "debug");
        env::set_var("LINKPACK_LOG_JSON", "true");

        let config = config_from_env();

        env::remove_var("LINKPACK_LOG_LEVEL");
        env::remove_var("LINKPACK_LOG_JSON");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.use_json);
    }

    #[test]
    #[serial]
    fn test_config_from_env_ignores_bad_json_flag() {
        env::remove_var("LINKPACK_LOG_LEVEL");
        env::set_var("LINKPACK_LOG_JSON", "sometimes");

        let config = config_from_env();

        env::remove_var("LINKPACK_LOG_JSON");

        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
    }
}
