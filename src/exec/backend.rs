// src/exec/backend.rs

//! Pluggable process backend.
//!
//! Tasks and pipeline stages that shell out (phantomas, critical, uncss,
//! image optimizers) talk to a [`ProcessBackend`] instead of spawning
//! directly. Production uses [`TokioProcessBackend`]; tests provide a fake
//! that records invocations and returns canned exit codes.

use std::fmt::Debug;
use std::path::PathBuf;

use crate::errors::Result;
use crate::types::BoxFuture;

/// What to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Bytes written to the child's stdin, which is then closed.
    pub stdin: Option<Vec<u8>>,
    /// Collect stdout instead of discarding it.
    pub capture_stdout: bool,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin(mut self, bytes: Vec<u8>) -> Self {
        self.stdin = Some(bytes);
        self
    }

    pub fn capture_stdout(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    /// `program arg1 arg2`, for log lines.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
}

impl ProcessExit {
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait abstracting how external processes are run.
///
/// Implementations resolve only once the process has exited; there is no
/// timeout. A program that cannot be found must be reported as
/// [`SitebuildError::ProgramNotFound`](crate::errors::SitebuildError::ProgramNotFound)
/// so callers can tell "tool not installed" apart from other failures.
pub trait ProcessBackend: Send + Sync + Debug {
    fn run(&self, spec: ProcessSpec) -> BoxFuture<'_, Result<ProcessExit>>;
}
