// src/pipeline/stages/external.rs

use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, SitebuildError};
use crate::exec::{ProcessBackend, ProcessSpec};
use crate::pipeline::record::{FileRecord, FileSet};
use crate::pipeline::stage::Stage;
use crate::pipeline::stages::fill_template;
use crate::types::BoxFuture;

/// Pipes each record through an external command.
///
/// The record is written to a scratch file whose path replaces `{input}` in
/// the argument template; `trailing` arguments are appended as-is. Whatever
/// the command prints on stdout becomes the new contents. Any failure,
/// including a missing program, fails the stage.
#[derive(Debug, Clone)]
pub struct ExternalFilterStage {
    name: String,
    program: String,
    args: Vec<String>,
    trailing: Vec<String>,
    processes: Arc<dyn ProcessBackend>,
}

impl ExternalFilterStage {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: &[String],
        processes: Arc<dyn ProcessBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.to_vec(),
            trailing: Vec::new(),
            processes,
        }
    }

    pub fn trailing_args(mut self, args: &[String]) -> Self {
        self.trailing = args.to_vec();
        self
    }

    async fn filter(&self, record: FileRecord) -> Result<FileRecord> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join(record.file_name());
        tokio::fs::write(&input, &record.contents).await?;

        let input_str = input.to_string_lossy();
        let spec = ProcessSpec::new(&self.program)
            .args(self.args.iter().map(|a| fill_template(a, &input_str, "")))
            .args(self.trailing.iter().cloned())
            .capture_stdout();

        let exit = self.processes.run(spec).await?;
        if !exit.success() {
            return Err(SitebuildError::Process {
                program: self.program.clone(),
                message: format!(
                    "exit code {} while processing {}",
                    exit.code.unwrap_or(-1),
                    record.display_path()
                ),
            });
        }

        debug!(
            stage = %self.name,
            path = %record.display_path(),
            before = record.contents.len(),
            after = exit.stdout.len(),
            "filtered"
        );
        Ok(record.with_contents(exit.stdout))
    }
}

impl Stage for ExternalFilterStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(files.len());
            for record in files {
                out.push(self.filter(record).await?);
            }
            Ok(out)
        })
    }
}
