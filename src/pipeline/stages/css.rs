// src/pipeline/stages/css.rs

//! Vendor prefixing and minification through `lightningcss`.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use tracing::debug;

use crate::errors::{Result, SitebuildError};
use crate::pipeline::record::FileSet;
use crate::pipeline::stage::Stage;
use crate::types::BoxFuture;

/// Resolve browserslist queries such as `"last 2 versions"` to targets.
pub fn browser_targets<S: AsRef<str>>(queries: &[S]) -> Result<Targets> {
    let queries: Vec<&str> = queries.iter().map(AsRef::as_ref).collect();
    let browsers = Browsers::from_browserslist(queries.iter().copied())
        .map_err(|e| SitebuildError::Config(format!("invalid browser query {queries:?}: {e}")))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

fn transform_css(
    code: &str,
    filename: String,
    targets: Targets,
    minify: bool,
) -> std::result::Result<String, String> {
    let mut sheet = StyleSheet::parse(
        code,
        ParserOptions {
            filename,
            ..ParserOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;

    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let out = sheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;

    Ok(out.code)
}

/// Adds the vendor prefixes the target browsers still need.
#[derive(Debug, Clone)]
pub struct AutoprefixStage {
    targets: Targets,
}

impl AutoprefixStage {
    pub fn new<S: AsRef<str>>(browsers: &[S]) -> Result<Self> {
        Ok(Self {
            targets: browser_targets(browsers)?,
        })
    }
}

impl Stage for AutoprefixStage {
    fn name(&self) -> &str {
        "autoprefixer"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move { rewrite_all(self.name(), files, self.targets, false) })
    }
}

/// Minifies each stylesheet in place.
#[derive(Debug, Clone, Default)]
pub struct MinifyCssStage {
    targets: Targets,
}

impl MinifyCssStage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for MinifyCssStage {
    fn name(&self) -> &str {
        "minify-css"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move { rewrite_all(self.name(), files, self.targets, true) })
    }
}

fn rewrite_all(stage: &str, files: FileSet, targets: Targets, minify: bool) -> Result<FileSet> {
    files
        .into_iter()
        .map(|record| {
            let path = record.display_path();
            let css = transform_css(record.text(stage)?, path.clone(), targets, minify)
                .map_err(|msg| SitebuildError::stage(stage, format!("{path}: {msg}")))?;
            debug!(stage, path = %path, bytes = css.len(), "rewrote stylesheet");
            Ok(record.with_contents(css))
        })
        .collect()
}
