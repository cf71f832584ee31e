// src/tasks/scripts.rs

use crate::errors::Result;
use crate::patterns::PatternSet;
use crate::pipeline::stages::{ConcatStage, MinifyJsStage};
use crate::pipeline::Pipeline;
use crate::tasks::{TaskContext, JS};

/// Concatenate and minify the site scripts into one bundle.
pub async fn js(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();

    let pipeline = Pipeline::new(
        JS,
        PatternSet::new(cfg.paths().js_sources.as_slice())?,
        &cfg.paths().js_dir,
    )
    .pipe(ConcatStage::new(&cfg.js().bundle))
    .pipe(MinifyJsStage::new());

    pipeline.run(ctx.fs(), &ctx.root(), ctx.locks()).await?;
    Ok(())
}
