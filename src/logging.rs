// src/logging.rs

//! Logging setup for `sitebuild` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SITEBUILD_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs are sent to STDERR; stdout carries the task listing and `--plan`
//! output only.

use std::time::Duration;

use anyhow::Result;
use console::{style, StyledObject};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("SITEBUILD_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(console::colors_enabled_stderr())
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Green tag for a successful outcome.
pub fn ok_tag<D>(tag: D) -> StyledObject<D> {
    style(tag).green().for_stderr()
}

/// Red tag for a failed outcome.
pub fn fail_tag<D>(tag: D) -> StyledObject<D> {
    style(tag).red().for_stderr()
}

/// Black-on-red tag for outcomes that are neither pass nor fail.
pub fn severe_tag<D>(tag: D) -> StyledObject<D> {
    style(tag).black().on_red().for_stderr()
}

/// Cyan task name, as in `Starting 'css'...`.
pub fn task_tag<D>(name: D) -> StyledObject<D> {
    style(name).cyan().for_stderr()
}

/// Human-sized duration: `850 μs`, `12 ms`, `1.4 s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let micros = elapsed.as_micros();
    if micros < 1_000 {
        format!("{micros} μs")
    } else if micros < 1_000_000 {
        format!("{} ms", micros / 1_000)
    } else {
        format!("{:.1} s", elapsed.as_secs_f64())
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_level_strings_are_lenient() {
        assert_eq!(parse_level_str(" DEBUG "), Some(tracing::Level::DEBUG));
        assert_eq!(parse_level_str("warning"), Some(tracing::Level::WARN));
        assert_eq!(parse_level_str("loud"), None);
    }

    #[test]
    fn elapsed_picks_a_readable_unit() {
        assert_eq!(format_elapsed(Duration::from_micros(850)), "850 μs");
        assert_eq!(format_elapsed(Duration::from_millis(12)), "12 ms");
        assert_eq!(format_elapsed(Duration::from_millis(1_400)), "1.4 s");
    }
}
