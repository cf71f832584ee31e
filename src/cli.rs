// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sitebuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitebuild",
    version,
    about = "Run the named asset-build tasks of a static website.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run, one after another. Runs `default` (the task listing)
    /// when none are given.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Sitebuild.toml` in the current working directory, falling
    /// back to built-in defaults if that file does not exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the execution order of each requested task, prerequisites
    /// included, without running anything.
    #[arg(long)]
    pub plan: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_tasks_keep_their_order() {
        let args = CliArgs::parse_from(["sitebuild", "css", "js", "--log-level", "debug"]);
        assert_eq!(args.tasks, vec!["css", "js"]);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(!args.plan);
        assert!(args.config.is_none());
    }

    #[test]
    fn no_tasks_is_allowed() {
        let args = CliArgs::parse_from(["sitebuild", "--plan"]);
        assert!(args.tasks.is_empty());
        assert!(args.plan);
    }
}
