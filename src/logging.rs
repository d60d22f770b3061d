//! Logging setup.
//!
//! Output goes to stderr so it never mixes with command output on stdout.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    /// Position on the quiet-to-verbose scale, `Off` lowest.
    fn verbosity_rank(self) -> u8 {
        match self {
            LogLevel::Off => 0,
            LogLevel::Error => 1,
            LogLevel::Warn => 2,
            LogLevel::Info => 3,
            LogLevel::Debug => 4,
            LogLevel::Trace => 5,
        }
    }

    /// Directive understood by [`EnvFilter`].
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" => Ok(LogLevel::Off),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
            LogLevel::Off => Level::ERROR, // Will be filtered out by directive
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert a `-v` count to a level: 0 = Info, 1 = Debug, 2+ = Trace.
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub with_timestamps: bool,
    /// Include the module path
    pub with_target: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamps: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// Pick the more verbose of `configured` and the `-v` count.
    pub fn from_verbosity(configured: LogLevel, verbosity: u8) -> Self {
        let requested = if verbosity == 0 {
            configured
        } else {
            LogLevel::from(verbosity)
        };
        let level = if requested.verbosity_rank() > configured.verbosity_rank() {
            requested
        } else {
            configured
        };
        Self::default().with_level(level)
    }

    fn filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.level.as_str())
        }
    }
}

/// Install the global subscriber.
///
/// Call once at startup. Returns false if a subscriber was already installed.
///
/// ```no_run
/// use shadow_nova::logging::{init_logging, LogLevel, LoggingConfig};
///
/// init_logging(LoggingConfig::new().with_level(LogLevel::Debug));
/// ```
pub fn init_logging(config: LoggingConfig) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_file(config.with_file)
        .with_line_number(config.with_line_number);

    let installed = if config.with_timestamps {
        subscriber.try_init()
    } else {
        subscriber.without_time().try_init()
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from(0), LogLevel::Info);
        assert_eq!(LogLevel::from(1), LogLevel::Debug);
        assert_eq!(LogLevel::from(2), LogLevel::Trace);
        assert_eq!(LogLevel::from(10), LogLevel::Trace);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" off ".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_from_verbosity_keeps_configured_level() {
        assert_eq!(LoggingConfig::from_verbosity(LogLevel::Warn, 0).level, LogLevel::Warn);
        assert_eq!(LoggingConfig::from_verbosity(LogLevel::Warn, 1).level, LogLevel::Debug);
    }

    #[test]
    fn test_from_verbosity_never_quiets_configured_level() {
        assert_eq!(LoggingConfig::from_verbosity(LogLevel::Trace, 1).level, LogLevel::Trace);
        assert_eq!(LoggingConfig::from_verbosity(LogLevel::Debug, 1).level, LogLevel::Debug);
        assert_eq!(LoggingConfig::from_verbosity(LogLevel::Off, 2).level, LogLevel::Trace);
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .with_level(LogLevel::Debug)
            .with_timestamps(false)
            .with_target(false);

        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.with_timestamps);
        assert!(!config.with_target);
    }

    #[test]
    fn test_second_init_is_rejected() {
        init_logging(LoggingConfig::default());
        assert!(!init_logging(LoggingConfig::default()));
    }
}
