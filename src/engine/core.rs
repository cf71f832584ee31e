// src/engine/core.rs

//! Pure dispatch state machine.
//!
//! Consumes [`DispatchEvent`]s and returns the commands the async shell
//! should execute. No channels, no Tokio, no IO, so the semantics can be
//! unit tested directly.

use std::collections::HashMap;

use tracing::{error, info};

use crate::engine::DispatchEvent;
use crate::logging::{fail_tag, ok_tag, task_tag};
use crate::types::TaskName;

/// Command produced by the core for the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCommand {
    /// Start a fresh invocation of this task.
    Invoke(TaskName),
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchStep {
    pub commands: Vec<DispatchCommand>,
    pub keep_running: bool,
}

impl DispatchStep {
    fn continue_with(commands: Vec<DispatchCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Tracks invocations in flight per task.
///
/// Every trigger starts an invocation, even when one for the same task is
/// still running. Writers of the same output directory are serialized
/// further down by the destination locks, not here.
#[derive(Debug, Default)]
pub struct DispatchCore {
    in_flight: HashMap<TaskName, usize>,
    started: u64,
    failed: u64,
}

impl DispatchCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invocations of `task` currently running.
    pub fn in_flight(&self, task: &str) -> usize {
        self.in_flight.get(task).copied().unwrap_or(0)
    }

    pub fn total_in_flight(&self) -> usize {
        self.in_flight.values().sum()
    }

    pub fn started(&self) -> u64 {
        self.started
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn step(&mut self, event: DispatchEvent) -> DispatchStep {
        match event {
            DispatchEvent::Triggered { task, path } => {
                let running = self.in_flight.entry(task.clone()).or_insert(0);
                if *running > 0 {
                    info!(
                        task = %task,
                        running = *running,
                        "'{}' is still running; starting another invocation",
                        task_tag(&task)
                    );
                }
                *running += 1;
                self.started += 1;

                info!(task = %task, "{} changed", path);
                DispatchStep::continue_with(vec![DispatchCommand::Invoke(task)])
            }
            DispatchEvent::Finished { task, ok } => {
                if let Some(running) = self.in_flight.get_mut(&task) {
                    *running = running.saturating_sub(1);
                    if *running == 0 {
                        self.in_flight.remove(&task);
                    }
                }

                if ok {
                    info!(task = %task, "{} '{}'", ok_tag("rebuilt"), task_tag(&task));
                } else {
                    self.failed += 1;
                    error!(
                        task = %task,
                        "{} '{}'; still watching",
                        fail_tag("rebuild failed"),
                        task_tag(&task)
                    );
                }
                DispatchStep::continue_with(Vec::new())
            }
            DispatchEvent::ShutdownRequested => DispatchStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
