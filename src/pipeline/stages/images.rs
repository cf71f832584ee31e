// src/pipeline/stages/images.rs

//! Lossless image optimization through external tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ToolCommand;
use crate::errors::{Result, SitebuildError};
use crate::exec::{ProcessBackend, ProcessSpec};
use crate::logging::ok_tag;
use crate::pipeline::record::{FileRecord, FileSet};
use crate::pipeline::stage::Stage;
use crate::pipeline::stages::fill_template;
use crate::types::BoxFuture;

/// Runs the optimizer configured for each file's extension.
///
/// Each file is copied to a scratch directory together with the tool's
/// support `files`, the tool writes its result
/// next to it, and the result replaces the record's contents. Files with no
/// configured optimizer, or whose optimizer is not installed, pass through
/// unchanged.
#[derive(Debug, Clone)]
pub struct ImageOptimizeStage {
    optimizers: BTreeMap<String, ToolCommand>,
    processes: Arc<dyn ProcessBackend>,
}

impl ImageOptimizeStage {
    pub fn new(
        optimizers: BTreeMap<String, ToolCommand>,
        processes: Arc<dyn ProcessBackend>,
    ) -> Self {
        Self {
            optimizers,
            processes,
        }
    }

    async fn optimize(&self, record: FileRecord, tool: &ToolCommand) -> Result<FileRecord> {
        let scratch = tempfile::tempdir()?;
        let name = record.file_name();
        let input = scratch.path().join(&name);
        let output = scratch.path().join(format!("optimized-{name}"));

        tokio::fs::write(&input, &record.contents).await?;
        for (file, contents) in &tool.files {
            tokio::fs::write(scratch.path().join(file), contents).await?;
        }

        let dir_str = scratch.path().to_string_lossy();
        let input_str = input.to_string_lossy();
        let output_str = output.to_string_lossy();
        let spec = ProcessSpec::new(&tool.program).args(
            tool.args
                .iter()
                .map(|a| fill_template(&a.replace("{dir}", &dir_str), &input_str, &output_str)),
        );

        let exit = match self.processes.run(spec).await {
            Ok(exit) => exit,
            Err(SitebuildError::ProgramNotFound(program)) => {
                warn!(
                    path = %record.display_path(),
                    "{program} is not installed; copying image unchanged"
                );
                return Ok(record);
            }
            Err(err) => return Err(err),
        };

        if !exit.success() {
            return Err(SitebuildError::Process {
                program: tool.program.clone(),
                message: format!(
                    "exit code {} while optimizing {}",
                    exit.code.unwrap_or(-1),
                    record.display_path()
                ),
            });
        }

        let optimized = tokio::fs::read(&output).await.map_err(|e| SitebuildError::Process {
            program: tool.program.clone(),
            message: format!("no output for {}: {e}", record.display_path()),
        })?;

        // Keep the original when the tool made it larger.
        if optimized.len() >= record.contents.len() {
            return Ok(record);
        }
        Ok(record.with_contents(optimized))
    }
}

impl Stage for ImageOptimizeStage {
    fn name(&self) -> &str {
        "imagemin"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(files.len());
            let mut before = 0usize;
            let mut after = 0usize;
            let mut optimized = 0usize;

            for record in files {
                let tool = record.extension().and_then(|ext| self.optimizers.get(&ext));
                let Some(tool) = tool else {
                    out.push(record);
                    continue;
                };

                let original = record.contents.len();
                let result = self.optimize(record, tool).await?;
                before += original;
                after += result.contents.len();
                optimized += 1;
                out.push(result);
            }

            let saved = before.saturating_sub(after);
            let percent = if before == 0 {
                0.0
            } else {
                saved as f64 * 100.0 / before as f64
            };
            info!(
                "{} Minified {} image{} (saved {} B - {:.1}%)",
                ok_tag("imagemin"),
                optimized,
                if optimized == 1 { "" } else { "s" },
                saved,
                percent
            );

            Ok(out)
        })
    }
}
