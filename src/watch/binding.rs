// src/watch/binding.rs

use crate::config::WatchBindingConfig;
use crate::errors::{Result, SitebuildError};
use crate::patterns::PatternSet;
use crate::types::TaskName;

/// A compiled pattern set plus the task it re-runs.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    patterns: PatternSet,
    task: TaskName,
}

impl WatchBinding {
    pub fn new(patterns: PatternSet, task: impl Into<TaskName>) -> Self {
        Self {
            patterns,
            task: task.into(),
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// `rel_path` is relative to the project root, with forward slashes.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.matches(rel_path)
    }
}

/// Compile every `[[watch]]` entry, in configured order.
pub fn build_bindings(configs: &[WatchBindingConfig]) -> Result<Vec<WatchBinding>> {
    configs
        .iter()
        .map(|cfg| {
            let patterns = PatternSet::new(cfg.patterns.as_slice()).map_err(|e| {
                SitebuildError::Config(format!("watch binding for '{}': {e:#}", cfg.task))
            })?;
            Ok(WatchBinding::new(patterns, cfg.task.clone()))
        })
        .collect()
}

/// Tasks bound to `rel_path`, in binding order. A task bound twice shows up
/// twice; each binding fires independently.
pub fn matching_tasks<'a>(bindings: &'a [WatchBinding], rel_path: &str) -> Vec<&'a str> {
    bindings
        .iter()
        .filter(|b| b.matches(rel_path))
        .map(WatchBinding::task)
        .collect()
}
