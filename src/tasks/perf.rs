// src/tasks/perf.rs

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::exec::{classify_perf_exit, PerfOutcome, ProcessSpec};
use crate::tasks::TaskContext;

/// Assert the site stays within its HTTP request budget.
///
/// Needs the preview server at `[perf] url` to be up already. With
/// `propagate_failure` off, every outcome is only logged.
pub async fn phantomas(ctx: TaskContext) -> Result<()> {
    let perf = ctx.config().perf();
    let limit = perf.request_limit;

    let spec = ProcessSpec::new(&perf.program).args([
        "--url".to_string(),
        perf.url.clone(),
        format!("--assert-requests={limit}"),
    ]);

    let exit = match ctx.processes().run(spec).await {
        Ok(exit) => exit,
        Err(err) => {
            error!("Phantomas: {err}");
            return if perf.propagate_failure { Err(err) } else { Ok(()) };
        }
    };

    let outcome = classify_perf_exit(exit.code);
    let line = format!("Phantomas: {}", outcome.describe(limit));
    match outcome {
        PerfOutcome::Pass => info!(exit_code = exit.code.unwrap_or(-1), "{line}"),
        PerfOutcome::Fail => warn!(exit_code = exit.code.unwrap_or(-1), "{line}"),
        PerfOutcome::Error(code) => error!(exit_code = code, "{line}"),
    }

    match outcome.into_error(limit) {
        Some(err) if perf.propagate_failure => Err(err),
        _ => Ok(()),
    }
}
