// src/pipeline/runner.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::patterns::PatternSet;
use crate::pipeline::dest::{write_records, DestinationLocks};
use crate::pipeline::source::load_sources;
use crate::pipeline::stage::Stage;

/// Sources → stages → destination.
///
/// ```ignore
/// Pipeline::new("js", PatternSet::new(&["_js/**/*.js"])?, "js")
///     .pipe(ConcatStage::new("all.min.js"))
///     .pipe(MinifyJsStage::new())
///     .run(fs, root, &locks)
///     .await?;
/// ```
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    sources: PatternSet,
    stages: Vec<Box<dyn Stage>>,
    dest: PathBuf,
}

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub inputs: usize,
    pub written: Vec<PathBuf>,
}

impl Pipeline {
    /// `dest` is relative to the project root.
    pub fn new(name: impl Into<String>, sources: PatternSet, dest: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            sources,
            stages: Vec::new(),
            dest: dest.into(),
        }
    }

    pub fn pipe(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run to completion.
    ///
    /// The destination directory is locked for the whole run. If any stage
    /// fails, the error is returned and nothing is written.
    pub async fn run(
        &self,
        fs: &Arc<dyn FileSystem>,
        root: &Path,
        locks: &DestinationLocks,
    ) -> Result<PipelineReport> {
        let dest_dir = root.join(&self.dest);
        let _guard = locks.acquire(&dest_dir).await;
        let started = Instant::now();

        let mut files = load_sources(fs.as_ref(), root, &self.sources)?;
        let inputs = files.len();
        debug!(pipeline = %self.name, inputs, "loaded sources");

        for stage in &self.stages {
            let before = files.len();
            files = stage.apply(files).await?;
            debug!(
                pipeline = %self.name,
                stage = %stage.name(),
                before,
                after = files.len(),
                "stage done"
            );
        }

        let written = write_records(fs.as_ref(), &dest_dir, &files)?;
        info!(
            pipeline = %self.name,
            inputs,
            outputs = written.len(),
            dest = ?dest_dir,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline finished"
        );

        Ok(PipelineReport { inputs, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SitebuildError;
    use crate::fs::mock::MockFileSystem;
    use crate::pipeline::record::FileSet;
    use crate::pipeline::stages::ConcatStage;
    use crate::types::BoxFuture;

    #[derive(Debug)]
    struct Explode;

    impl Stage for Explode {
        fn name(&self) -> &str {
            "explode"
        }

        fn apply(&self, _files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
            Box::pin(async { Err(SitebuildError::stage("explode", "boom")) })
        }
    }

    fn project() -> (MockFileSystem, Arc<dyn FileSystem>) {
        let mock = MockFileSystem::new();
        mock.add_file("./_js/a.js", "var a;");
        mock.add_file("./_js/b.js", "var b;");
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());
        (mock, fs)
    }

    #[tokio::test]
    async fn writes_stage_output_under_dest() {
        let (mock, fs) = project();
        let pipeline = Pipeline::new("js", PatternSet::new(&["_js/**/*.js"]).unwrap(), "js")
            .pipe(ConcatStage::new("all.js"));

        let report = pipeline
            .run(&fs, Path::new("."), &DestinationLocks::new())
            .await
            .unwrap();

        assert_eq!(report.inputs, 2);
        assert_eq!(report.written, vec![PathBuf::from("./js/all.js")]);
        assert_eq!(fs.read(Path::new("./js/all.js")).unwrap(), b"var a;\nvar b;");
        assert!(mock.file_paths().contains(&PathBuf::from("./js/all.js")));
    }

    #[tokio::test]
    async fn failing_stage_writes_nothing() {
        let (mock, fs) = project();
        let pipeline = Pipeline::new("js", PatternSet::new(&["_js/**/*.js"]).unwrap(), "js")
            .pipe(Explode)
            .pipe(ConcatStage::new("all.js"));

        let before = mock.file_paths();
        let err = pipeline
            .run(&fs, Path::new("."), &DestinationLocks::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SitebuildError::Stage { .. }));
        assert_eq!(mock.file_paths(), before);
    }
}
