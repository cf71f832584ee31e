// src/pipeline/record.rs

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, SitebuildError};

/// One file flowing through a pipeline.
///
/// `base` is the static directory the file was found under (relative to the
/// project root) and `relative` the path below it; a destination writes the
/// record to `dest/relative`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub base: PathBuf,
    pub relative: PathBuf,
    pub contents: Vec<u8>,
}

/// Ordered sequence of records handed from stage to stage.
pub type FileSet = Vec<FileRecord>;

impl FileRecord {
    pub fn new(
        base: impl Into<PathBuf>,
        relative: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            base: base.into(),
            relative: relative.into(),
            contents: contents.into(),
        }
    }

    /// Project-relative path the record was loaded from.
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.relative)
    }

    /// `path()` with forward slashes, for logs and matching.
    pub fn display_path(&self) -> String {
        slash_path(&self.path())
    }

    pub fn file_name(&self) -> String {
        self.relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lowercased extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.relative
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        self.relative.set_extension(ext);
        self
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Contents as UTF-8; stages working on text fail with `stage` named.
    pub fn text(&self, stage: &str) -> Result<&str> {
        std::str::from_utf8(&self.contents).map_err(|e| {
            SitebuildError::stage(stage, format!("{} is not UTF-8: {e}", self.display_path()))
        })
    }
}

/// Render a path with `/` separators and without `./` components.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_base_and_relative() {
        let rec = FileRecord::new("_sass", "pages/home.scss", "");
        assert_eq!(rec.display_path(), "_sass/pages/home.scss");
        assert_eq!(rec.file_name(), "home.scss");
        assert_eq!(rec.extension().as_deref(), Some("scss"));

        let css = rec.with_extension("css");
        assert_eq!(css.relative, PathBuf::from("pages/home.css"));
    }

    #[test]
    fn slash_path_drops_cur_dir() {
        assert_eq!(slash_path(Path::new("./css/main.css")), "css/main.css");
    }

    #[test]
    fn non_utf8_contents_name_the_stage() {
        let rec = FileRecord::new("css", "bad.css", vec![0xff, 0xfe]);
        let err = rec.text("minify-css").unwrap_err();
        assert!(err.to_string().contains("minify-css"));
        assert!(err.to_string().contains("css/bad.css"));
    }
}
