// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod patterns;
pub mod pipeline;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_for_cli;
use crate::dag::{PlanStep, TaskRegistry};
use crate::errors::Result;
use crate::exec::TokioProcessBackend;
use crate::fs::RealFileSystem;
use crate::tasks::{build_registry, TaskContext, DEFAULT};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (built-in defaults when there is no `Sitebuild.toml`)
/// - the task registry, validated before anything runs
/// - the real filesystem and process backends
///
/// Requested tasks run one after another; the first failure stops the
/// sequence. With no task named, `default` runs.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_for_cli(args.config.as_deref().map(Path::new))?;
    let registry = build_registry(&cfg)?;

    let requested: Vec<String> = if args.tasks.is_empty() {
        vec![DEFAULT.to_string()]
    } else {
        args.tasks.clone()
    };

    if args.plan {
        print_plan(&registry, &requested)?;
        return Ok(());
    }

    info!(root = ?cfg.root(), tasks = ?requested, "sitebuild starting");

    let ctx = TaskContext::new(
        cfg,
        registry,
        Arc::new(RealFileSystem),
        Arc::new(TokioProcessBackend::new()),
    );
    let invoker = ctx.invoker();

    for name in &requested {
        let report = invoker.invoke(name).await?;
        debug!(task = %name, steps = report.steps.len(), "invocation complete");
    }
    Ok(())
}

/// Print the resolved run order of each task without running anything.
///
/// Every plan is resolved before anything is printed, so an unknown name
/// fails without partial output.
pub fn print_plan(registry: &TaskRegistry, tasks: &[String]) -> Result<()> {
    let plans = tasks
        .iter()
        .map(|name| registry.plan(name).map(|plan| (name, plan)))
        .collect::<Result<Vec<_>>>()?;

    println!("sitebuild plan");
    for (name, plan) in plans {
        println!();
        println!("{name}:");
        print!("{}", render_plan(&plan));
    }

    debug!("plan complete (no execution)");
    Ok(())
}

/// One indented line per step, nested by prerequisite depth.
pub fn render_plan(plan: &[PlanStep]) -> String {
    plan.iter()
        .enumerate()
        .map(|(i, step)| {
            format!(
                "  {:>2}. {}{}\n",
                i + 1,
                "  ".repeat(step.depth),
                step.task
            )
        })
        .collect()
}
