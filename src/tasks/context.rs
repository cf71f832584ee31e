// src/tasks/context.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::ConfigFile;
use crate::dag::{Invoker, TaskRegistry};
use crate::exec::ProcessBackend;
use crate::fs::FileSystem;
use crate::pipeline::DestinationLocks;

/// Everything a task body may use, shared by all invocations of one run.
///
/// Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct TaskContext {
    config: Arc<ConfigFile>,
    registry: Arc<TaskRegistry>,
    fs: Arc<dyn FileSystem>,
    processes: Arc<dyn ProcessBackend>,
    locks: DestinationLocks,
    invocation_ids: Arc<AtomicU64>,
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("root", &self.config.root())
            .field("tasks", &self.registry)
            .field("fs", &self.fs)
            .field("processes", &self.processes)
            .finish_non_exhaustive()
    }
}

impl TaskContext {
    pub fn new(
        config: ConfigFile,
        registry: TaskRegistry,
        fs: Arc<dyn FileSystem>,
        processes: Arc<dyn ProcessBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            fs,
            processes,
            locks: DestinationLocks::new(),
            invocation_ids: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn processes(&self) -> &Arc<dyn ProcessBackend> {
        &self.processes
    }

    pub fn locks(&self) -> &DestinationLocks {
        &self.locks
    }

    /// Project root all configured paths are relative to.
    pub fn root(&self) -> PathBuf {
        self.config.root()
    }

    pub fn project_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.config.project_path(rel)
    }

    /// An invoker sharing this context.
    pub fn invoker(&self) -> Invoker {
        Invoker::new(self.clone())
    }

    pub(crate) fn next_invocation_id(&self) -> u64 {
        self.invocation_ids.fetch_add(1, Ordering::Relaxed) + 1
    }
}
