// src/engine/launcher.rs

use std::fmt::Debug;

use tokio::sync::mpsc;
use tracing::debug;

use crate::dag::Invoker;
use crate::engine::DispatchEvent;
use crate::errors::Result;
use crate::types::TaskName;

/// Starts a task invocation without waiting for it.
///
/// Implementations must eventually send exactly one
/// [`DispatchEvent::Finished`] for `task` on `done`. Tests use a fake that
/// records launches instead of running anything.
pub trait TaskLauncher: Send + Sync + Debug {
    fn launch(&self, task: TaskName, done: mpsc::Sender<DispatchEvent>) -> Result<()>;
}

/// Production launcher: each invocation runs as its own Tokio task.
#[derive(Debug, Clone)]
pub struct InvokerLauncher {
    invoker: Invoker,
}

impl InvokerLauncher {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl TaskLauncher for InvokerLauncher {
    fn launch(&self, task: TaskName, done: mpsc::Sender<DispatchEvent>) -> Result<()> {
        let invoker = self.invoker.clone();
        tokio::spawn(async move {
            // The invoker has already logged any failure.
            let ok = invoker.invoke(&task).await.is_ok();
            if done.send(DispatchEvent::Finished { task, ok }).await.is_err() {
                debug!("dispatcher stopped before invocation finished");
            }
        });
        Ok(())
    }
}
