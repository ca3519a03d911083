//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `MINISHELL_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! Logs go to STDERR so that the stdout of commands stays untouched.

use anyhow::Result;
use std::str::FromStr;
use tracing_subscriber::fmt;

/// Environment variable consulted when no level is given on the command line.
pub const LOG_ENV: &str = "MINISHELL_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Pick the effective level from the CLI value and the environment.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    cli_level
        .or_else(|| env_value.and_then(|s| s.parse().ok()))
        .unwrap_or(LogLevel::Warn)
}

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(tracing::Level::from(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_environment() {
        assert_eq!(
            resolve_level(Some(LogLevel::Debug), Some("error")),
            LogLevel::Debug
        );
    }

    #[test]
    fn environment_used_when_cli_is_silent() {
        assert_eq!(resolve_level(None, Some(" INFO ")), LogLevel::Info);
    }

    #[test]
    fn garbage_falls_back_to_warn() {
        assert_eq!(resolve_level(None, Some("loud")), LogLevel::Warn);
        assert_eq!(resolve_level(None, None), LogLevel::Warn);
    }
}
