// src/tasks/critical.rs

use tracing::info;

use crate::config::CriticalSection;
use crate::errors::{Result, SitebuildError};
use crate::exec::ProcessSpec;
use crate::logging::ok_tag;
use crate::tasks::{TaskContext, CRITICAL};

/// Command-line arguments for the `critical` CLI.
pub fn critical_args(cfg: &CriticalSection) -> Vec<String> {
    let mut args = vec![
        cfg.src.clone(),
        "--base".to_string(),
        cfg.base.to_string_lossy().into_owned(),
    ];
    for css in &cfg.css {
        args.push("--css".to_string());
        args.push(css.clone());
    }
    for viewport in &cfg.dimensions {
        args.push("--dimensions".to_string());
        args.push(viewport.to_string());
    }
    args.push("--target".to_string());
    args.push(cfg.target.clone());
    if cfg.minify {
        args.push("--minify".to_string());
    }
    args
}

/// Extract above-the-fold CSS for the home page into the includes
/// directory. The task completes when the generator process exits.
pub async fn critical(ctx: TaskContext) -> Result<()> {
    let cfg = ctx.config().critical();
    let spec = ProcessSpec::new(&cfg.program)
        .args(critical_args(cfg))
        .cwd(ctx.root());

    let exit = ctx.processes().run(spec).await?;
    if !exit.success() {
        return Err(SitebuildError::Process {
            program: cfg.program.clone(),
            message: format!("exit code {}", exit.code.unwrap_or(-1)),
        });
    }

    info!("{} generated {}", ok_tag(CRITICAL), cfg.target);
    Ok(())
}
