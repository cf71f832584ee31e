// src/dag/invoker.rs

//! Running a task by name: prerequisites first, one at a time, then the
//! task's own body.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::dag::graph::PlanStep;
use crate::errors::{Result, SitebuildError};
use crate::logging::{fail_tag, format_elapsed, task_tag};
use crate::tasks::TaskContext;
use crate::types::TaskName;

/// Per-step state within one invocation.
///
/// `NotStarted → PrerequisitesRunning → BodyRunning → Completed | Failed`.
/// `Failed` is terminal; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    NotStarted,
    PrerequisitesRunning,
    BodyRunning,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub task: TaskName,
    pub depth: usize,
    pub state: TaskRunState,
    /// Body run time; `None` when the body never started.
    pub elapsed: Option<Duration>,
}

/// Final state of every step of one invocation, in plan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReport {
    pub id: u64,
    pub requested: TaskName,
    pub steps: Vec<StepReport>,
}

impl InvocationReport {
    /// Tasks whose body completed, in the order they ran.
    pub fn completed(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.state == TaskRunState::Completed)
            .map(|s| s.task.as_str())
            .collect()
    }

    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.state == TaskRunState::Completed)
    }

    /// Step that failed, if any.
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .filter(|s| s.elapsed.is_some())
            .find(|s| s.state == TaskRunState::Failed)
    }
}

/// Invokes registered tasks against a shared [`TaskContext`].
#[derive(Debug, Clone)]
pub struct Invoker {
    ctx: TaskContext,
}

impl Invoker {
    pub fn new(ctx: TaskContext) -> Self {
        Self { ctx }
    }

    /// Resolve the run order for `name` without running anything.
    pub fn plan(&self, name: &str) -> Result<Vec<PlanStep>> {
        self.ctx.registry().plan(name)
    }

    /// Run `name` and everything it depends on.
    ///
    /// Unknown names and cycles are detected before any body starts. The
    /// first failing body ends the invocation with its error.
    pub async fn invoke(&self, name: &str) -> Result<InvocationReport> {
        let (report, outcome) = self.invoke_with_report(name).await?;
        outcome.map(|()| report)
    }

    /// Like [`invoke`](Self::invoke), but hands back the report even when a
    /// body failed. The outer error only covers plan resolution.
    pub async fn invoke_with_report(
        &self,
        name: &str,
    ) -> Result<(InvocationReport, Result<()>)> {
        let plan = self.plan(name).inspect_err(|err| {
            error!(task = %name, "{} {}", fail_tag("cannot run"), err);
        })?;

        let id = self.ctx.next_invocation_id();
        let mut states = vec![TaskRunState::NotStarted; plan.len()];
        let mut elapsed = vec![None; plan.len()];
        let mut outcome = Ok(());

        debug!(
            task = %name,
            invocation = id,
            steps = plan.len(),
            "resolved plan"
        );

        for (index, step) in plan.iter().enumerate() {
            enter_prerequisites(&plan, &mut states, index);
            states[index] = TaskRunState::BodyRunning;

            info!(task = %step.task, invocation = id, "Starting '{}'...", task_tag(&step.task));
            let started = Instant::now();
            let result = self.run_body(&step.task).await;
            let took = started.elapsed();
            elapsed[index] = Some(took);

            match result {
                Ok(()) => {
                    states[index] = TaskRunState::Completed;
                    info!(
                        task = %step.task,
                        invocation = id,
                        "Finished '{}' after {}",
                        task_tag(&step.task),
                        format_elapsed(took)
                    );
                }
                Err(err) => {
                    states[index] = TaskRunState::Failed;
                    fail_enclosing(&plan, &mut states, index);
                    error!(
                        task = %step.task,
                        invocation = id,
                        "'{}' {} after {}: {}",
                        task_tag(&step.task),
                        fail_tag("errored"),
                        format_elapsed(took),
                        err
                    );
                    outcome = Err(err);
                    break;
                }
            }
        }

        let steps = plan
            .into_iter()
            .zip(states)
            .zip(elapsed)
            .map(|((step, state), elapsed)| StepReport {
                task: step.task,
                depth: step.depth,
                state,
                elapsed,
            })
            .collect();

        Ok((
            InvocationReport {
                id,
                requested: name.to_string(),
                steps,
            },
            outcome,
        ))
    }

    async fn run_body(&self, name: &str) -> Result<()> {
        let body = self
            .ctx
            .registry()
            .get(name)
            .map(|task| Arc::clone(task.body()))
            .ok_or_else(|| SitebuildError::UnknownTask(name.to_string()))?;
        body(self.ctx.clone()).await
    }
}

/// Steps whose prerequisite range contains `index`.
fn enclosing(plan: &[PlanStep], index: usize) -> impl Iterator<Item = usize> + '_ {
    (index + 1..plan.len()).filter(move |&i| plan[i].first_prerequisite <= index)
}

fn enter_prerequisites(plan: &[PlanStep], states: &mut [TaskRunState], index: usize) {
    for i in enclosing(plan, index) {
        if states[i] == TaskRunState::NotStarted {
            states[i] = TaskRunState::PrerequisitesRunning;
            debug!(task = %plan[i].task, "waiting on prerequisites");
        }
    }
}

fn fail_enclosing(plan: &[PlanStep], states: &mut [TaskRunState], index: usize) {
    for i in enclosing(plan, index) {
        states[i] = TaskRunState::Failed;
    }
}
