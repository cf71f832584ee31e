use std::sync::{Arc, Mutex};

use sitebuild::engine::{DispatchEvent, TaskLauncher};
use sitebuild::errors::Result;
use sitebuild::types::TaskName;
use tokio::sync::mpsc;

/// A fake launcher that:
/// - records which tasks were launched, in order
/// - optionally reports `Finished { ok }` right away; otherwise the
///   invocation stays "in flight" forever.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    launched: Arc<Mutex<Vec<TaskName>>>,
    finish_with: Option<bool>,
}

impl FakeLauncher {
    /// Never reports completion.
    pub fn hanging() -> Self {
        Self::default()
    }

    /// Reports completion with `ok` for every launch.
    pub fn finishing(ok: bool) -> Self {
        Self {
            launched: Arc::default(),
            finish_with: Some(ok),
        }
    }

    pub fn launched(&self) -> Vec<TaskName> {
        self.launched.lock().unwrap().clone()
    }
}

impl TaskLauncher for FakeLauncher {
    fn launch(&self, task: TaskName, done: mpsc::Sender<DispatchEvent>) -> Result<()> {
        self.launched.lock().unwrap().push(task.clone());
        if let Some(ok) = self.finish_with {
            tokio::spawn(async move {
                let _ = done.send(DispatchEvent::Finished { task, ok }).await;
            });
        }
        Ok(())
    }
}
