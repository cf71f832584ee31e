// src/pipeline/stages/sass.rs

//! Sass → CSS through `grass`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use grass::{ErrorKind, Options, OutputStyle};
use tracing::{error, info};

use crate::errors::{Result, SitebuildError};
use crate::fs::FileSystem;
use crate::logging::{fail_tag, ok_tag};
use crate::pipeline::record::{FileRecord, FileSet};
use crate::pipeline::stage::Stage;
use crate::types::{BoxFuture, SassStyle};

#[derive(Debug, Clone)]
pub struct SassStage {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    style: SassStyle,
    load_paths: Vec<PathBuf>,
    skip_partials: bool,
}

/// A compile failure for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SassFailure {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl SassStage {
    /// `load_paths` are relative to `root`.
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, style: SassStyle) -> Self {
        Self {
            fs,
            root: root.into(),
            style,
            load_paths: Vec::new(),
            skip_partials: true,
        }
    }

    pub fn load_paths(mut self, paths: &[PathBuf]) -> Self {
        self.load_paths = paths.to_vec();
        self
    }

    pub fn skip_partials(mut self, skip: bool) -> Self {
        self.skip_partials = skip;
        self
    }

    fn compile(&self, record: &FileRecord) -> std::result::Result<String, SassFailure> {
        let file = record.file_name();
        let source = std::str::from_utf8(&record.contents).map_err(|e| SassFailure {
            file: file.clone(),
            line: 0,
            message: format!("not UTF-8: {e}"),
        })?;

        let adapter = GrassFs(self.fs.as_ref());
        let own_dir = self.root.join(record.path());
        let own_dir = own_dir.parent().unwrap_or(Path::new("."));

        let mut options = Options::default()
            .style(match self.style {
                SassStyle::Expanded => OutputStyle::Expanded,
                SassStyle::Compressed => OutputStyle::Compressed,
            })
            .fs(&adapter)
            .load_path(own_dir);
        for extra in &self.load_paths {
            options = options.load_path(self.root.join(extra));
        }

        grass::from_string(source.to_owned(), &options).map_err(|err| {
            let rendered = err.to_string();
            match (*err).kind() {
                ErrorKind::ParseError { message, loc, .. } => {
                    // Errors inside an imported partial point at that file.
                    let origin = loc.file.name();
                    let file = if origin.is_empty() || origin == "stdin" {
                        file.clone()
                    } else {
                        short_name(origin)
                    };
                    SassFailure {
                        file,
                        line: loc.begin.line + 1,
                        message,
                    }
                }
                _ => SassFailure {
                    file: file.clone(),
                    line: 0,
                    message: rendered,
                },
            }
        })
    }
}

impl Stage for SassStage {
    fn name(&self) -> &str {
        "sass"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(files.len());
            let mut failures = Vec::new();

            for record in files {
                if self.skip_partials && record.file_name().starts_with('_') {
                    continue;
                }

                match self.compile(&record) {
                    Ok(css) => {
                        let record = record.with_extension("css").with_contents(css);
                        info!("{} compiled to {}", ok_tag("sass"), record.file_name());
                        out.push(record);
                    }
                    Err(failure) => {
                        error!("{}", fail_tag("Sass failed to compile"));
                        error!(
                            path = %record.display_path(),
                            "{} {} line {}: {}",
                            fail_tag(">"),
                            failure.file,
                            failure.line,
                            failure.message
                        );
                        failures.push(failure);
                    }
                }
            }

            match failures.into_iter().next() {
                None => Ok(out),
                Some(first) => Err(SitebuildError::Compile {
                    file: first.file,
                    line: first.line,
                    message: first.message,
                }),
            }
        })
    }
}

fn short_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

/// Lets `@import`/`@use` resolve through our filesystem seam.
#[derive(Debug)]
struct GrassFs<'a>(&'a dyn FileSystem);

impl grass::Fs for GrassFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.0.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.0
            .read(path)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::fs::RealFileSystem;

    fn stage(fs: &MockFileSystem) -> SassStage {
        SassStage::new(Arc::new(fs.clone()), ".", SassStyle::Expanded)
            .load_paths(&[PathBuf::from("_sass")])
    }

    #[tokio::test]
    async fn compiles_and_renames_skipping_partials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("_sass")).unwrap();
        std::fs::write(dir.path().join("_sass/_vars.scss"), "$brand: #336699;\n").unwrap();

        let files = vec![
            FileRecord::new("_sass", "_vars.scss", "$brand: #336699;\n"),
            FileRecord::new("_sass", "main.scss", "@import 'vars';\n.a { color: $brand; }\n"),
        ];

        let stage = SassStage::new(Arc::new(RealFileSystem), dir.path(), SassStyle::Expanded);
        let out = stage.apply(files).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relative, PathBuf::from("main.css"));

        let css = String::from_utf8(out[0].contents.clone()).unwrap();
        assert!(css.contains("color: #336699"), "got: {css}");
    }

    #[tokio::test]
    async fn undefined_variable_reports_file_and_line() {
        let fs = MockFileSystem::new();
        let files = vec![FileRecord::new(
            "_sass",
            "main.scss",
            ".a {\n  color: $undefined;\n}\n",
        )];

        let err = stage(&fs).apply(files).await.unwrap_err();
        match err {
            SitebuildError::Compile { file, line, message } => {
                assert_eq!(file, "main.scss");
                assert_eq!(line, 2);
                assert!(message.contains("Undefined variable"), "got: {message}");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn short_name_strips_directories() {
        assert_eq!(short_name("_sass/partials/_grid.scss"), "_grid.scss");
        assert_eq!(short_name("main.scss"), "main.scss");
    }
}
