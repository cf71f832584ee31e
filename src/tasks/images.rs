// src/tasks/images.rs

use crate::errors::Result;
use crate::patterns::PatternSet;
use crate::pipeline::stages::ImageOptimizeStage;
use crate::pipeline::Pipeline;
use crate::tasks::{TaskContext, IMAGEMIN};

/// Optimize source images into the image output directory.
pub async fn imagemin(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config();

    let pipeline = Pipeline::new(
        IMAGEMIN,
        PatternSet::new(cfg.paths().image_sources.as_slice())?,
        &cfg.paths().img_dir,
    )
    .pipe(ImageOptimizeStage::new(
        cfg.images().optimizers.clone(),
        ctx.processes().clone(),
    ));

    pipeline.run(ctx.fs(), &ctx.root(), ctx.locks()).await?;
    Ok(())
}
