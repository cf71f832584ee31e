// src/errors.rs

//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitebuildError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Asking for a task name nobody registered.
    #[error("Task not found: {0}")]
    UnknownTask(String),

    #[error("Cycle detected in task graph: {0}")]
    DependencyCycle(String),

    /// A stylesheet (or script) that failed to compile.
    #[error("{file} line {line}: {message}")]
    Compile {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{stage} failed: {message}")]
    Stage { stage: String, message: String },

    #[error("program not found: {0}")]
    ProgramNotFound(String),

    #[error("process '{program}' failed: {message}")]
    Process { program: String, message: String },

    #[error("performance budget exceeded: more than {limit} HTTP requests")]
    PerfBudgetExceeded { limit: u32 },

    #[error("performance check errored with exit code {code}")]
    PerfCheckErrored { code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SitebuildError {
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        SitebuildError::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitebuildError>;
