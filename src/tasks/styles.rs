// src/tasks/styles.rs

//! `clean-css`, `sass`, `css` and `uncss`.

use tracing::{debug, error, info};

use crate::errors::{Result, SitebuildError};
use crate::logging::{fail_tag, ok_tag};
use crate::patterns::{compile, PatternSet};
use crate::pipeline::stages::{
    AutoprefixStage, ConcatStage, ExternalFilterStage, MinifyCssStage, SassStage,
};
use crate::pipeline::Pipeline;
use crate::tasks::{TaskContext, CLEAN_CSS, CSS, SASS, UNCSS};

/// Delete generated stylesheets from the CSS directory.
///
/// Only direct children whose file name matches `[clean] patterns` are
/// removed; subdirectories and every other file stay. Failures are logged
/// and do not fail the task.
pub async fn clean_css(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();
    let css_dir = ctx.project_path(&cfg.paths().css_dir);
    let matchers = cfg
        .clean()
        .patterns
        .iter()
        .map(|p| compile(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let _guard = ctx.locks().acquire(&css_dir).await;
    let fs = ctx.fs();

    if !fs.is_dir(&css_dir) {
        debug!(dir = ?css_dir, "no CSS directory; nothing to clean");
        info!("{} deleted old stylesheets", ok_tag(CLEAN_CSS));
        return Ok(());
    }

    let entries = match fs.read_dir(&css_dir) {
        Ok(entries) => entries,
        Err(err) => {
            error!("{} {:#}", fail_tag(CLEAN_CSS), err);
            return Ok(());
        }
    };

    let mut failures = 0usize;
    for entry in entries {
        if !fs.is_file(&entry) {
            continue;
        }
        let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !matchers.iter().any(|m| m.is_match(name)) {
            continue;
        }

        match fs.remove_file(&entry) {
            Ok(()) => debug!(path = ?entry, "deleted"),
            Err(err) => {
                failures += 1;
                error!("{} {:#}", fail_tag(CLEAN_CSS), err);
            }
        }
    }

    if failures == 0 {
        info!("{} deleted old stylesheets", ok_tag(CLEAN_CSS));
    }
    Ok(())
}

/// Compile Sass sources and prefix the result into the CSS directory.
pub async fn sass(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();
    let sass_cfg = cfg.sass();

    let compiler = SassStage::new(ctx.fs().clone(), ctx.root(), sass_cfg.style)
        .load_paths(&sass_cfg.load_paths)
        .skip_partials(sass_cfg.skip_partials);

    let pipeline = Pipeline::new(
        SASS,
        PatternSet::new(cfg.paths().sass_sources.as_slice())?,
        &cfg.paths().css_dir,
    )
    .pipe(compiler)
    .pipe(AutoprefixStage::new(cfg.autoprefixer().browsers.as_slice())?);

    pipeline.run(ctx.fs(), &ctx.root(), ctx.locks()).await?;
    Ok(())
}

/// Combine every stylesheet in the CSS directory into one minified bundle.
pub async fn css(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();

    let pipeline = Pipeline::new(
        CSS,
        PatternSet::new(cfg.css().sources.as_slice())?,
        &cfg.paths().css_dir,
    )
    .pipe(ConcatStage::new(&cfg.css().bundle))
    .pipe(MinifyCssStage::new());

    let report = pipeline.run(ctx.fs(), &ctx.root(), ctx.locks()).await?;
    if report.written.is_empty() {
        info!("{} no stylesheets to combine", ok_tag(CSS));
    }
    Ok(())
}

/// Strip the vendor rules the rendered pages never use.
///
/// Needs the preview server from `[uncss] pages` to be up already.
pub async fn uncss(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();
    let uncss_cfg = cfg.uncss();

    if uncss_cfg.pages.is_empty() {
        return Err(SitebuildError::Config(
            "uncss needs at least one page in [uncss] pages".to_string(),
        ));
    }

    let filter = ExternalFilterStage::new(
        UNCSS,
        &uncss_cfg.program,
        &uncss_cfg.args,
        ctx.processes().clone(),
    )
    .trailing_args(&uncss_cfg.pages);

    let pipeline = Pipeline::new(
        UNCSS,
        PatternSet::new(uncss_cfg.stylesheets.as_slice())?,
        &cfg.paths().css_dir,
    )
    .pipe(filter);

    let report = pipeline.run(ctx.fs(), &ctx.root(), ctx.locks()).await?;
    info!(
        "{} stripped {} stylesheet{}",
        ok_tag(UNCSS),
        report.written.len(),
        if report.written.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
