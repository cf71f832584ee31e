// src/exec/process.rs

//! Production process backend on top of `tokio::process`.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, SitebuildError};
use crate::exec::backend::{ProcessBackend, ProcessExit, ProcessSpec};
use crate::types::BoxFuture;

/// Spawns real child processes and waits for them to exit.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessBackend;

impl TokioProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessBackend for TokioProcessBackend {
    fn run(&self, spec: ProcessSpec) -> BoxFuture<'_, Result<ProcessExit>> {
        Box::pin(run_process(spec))
    }
}

async fn run_process(spec: ProcessSpec) -> Result<ProcessExit> {
    info!(cmd = %spec.display(), "starting process");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(if spec.capture_stdout {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|err| match err.kind() {
        ErrorKind::NotFound => SitebuildError::ProgramNotFound(spec.program.clone()),
        _ => SitebuildError::Process {
            program: spec.program.clone(),
            message: format!("spawn failed: {err}"),
        },
    })?;

    // Feed stdin from a separate task so a chatty child cannot deadlock us
    // while we are still writing.
    let writer = match (child.stdin.take(), spec.stdin) {
        (Some(mut stdin), Some(bytes)) => Some(tokio::spawn(async move {
            let res = stdin.write_all(&bytes).await;
            drop(stdin);
            res
        })),
        _ => None,
    };

    let output = child
        .wait_with_output()
        .await
        .map_err(|err| SitebuildError::Process {
            program: spec.program.clone(),
            message: format!("waiting for exit failed: {err}"),
        })?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) if err.kind() == ErrorKind::BrokenPipe => {
                debug!(program = %spec.program, "child closed stdin early");
            }
            Ok(Err(err)) => warn!(program = %spec.program, error = %err, "writing stdin failed"),
            Err(err) => warn!(program = %spec.program, error = %err, "stdin writer panicked"),
        }
    }

    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(program = %spec.program, "stderr: {}", line);
    }

    let code = output.status.code();
    info!(
        program = %spec.program,
        exit_code = code.unwrap_or(-1),
        success = output.status.success(),
        "process exited"
    );

    Ok(ProcessExit {
        code,
        stdout: output.stdout,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let backend = TokioProcessBackend::new();
        let exit = backend
            .run(ProcessSpec::new("sh").args(["-c", "printf hello; exit 3"]).capture_stdout())
            .await
            .unwrap();

        assert_eq!(exit.code, Some(3));
        assert_eq!(exit.stdout, b"hello");
        assert!(!exit.success());
    }

    #[tokio::test]
    async fn pipes_stdin_through() {
        let backend = TokioProcessBackend::new();
        let exit = backend
            .run(
                ProcessSpec::new("cat")
                    .stdin(b"a { color: red }".to_vec())
                    .capture_stdout(),
            )
            .await
            .unwrap();

        assert!(exit.success());
        assert_eq!(exit.stdout, b"a { color: red }");
    }

    #[tokio::test]
    async fn missing_program_is_distinguishable() {
        let backend = TokioProcessBackend::new();
        let err = backend
            .run(ProcessSpec::new("definitely-not-a-real-binary-7c1f"))
            .await
            .unwrap_err();

        assert!(matches!(err, SitebuildError::ProgramNotFound(p) if p.contains("7c1f")));
    }
}
