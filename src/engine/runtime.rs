// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::core::{DispatchCommand, DispatchCore};
use crate::engine::launcher::TaskLauncher;
use crate::engine::DispatchEvent;
use crate::errors::Result;

/// Drives [`DispatchCore`] from a channel of [`DispatchEvent`]s and hands
/// `Invoke` commands to a [`TaskLauncher`].
///
/// Runs until a `ShutdownRequested` event arrives. Invocations still
/// running at that point are left to finish on their own Tokio tasks.
pub struct Dispatcher<L: TaskLauncher> {
    core: DispatchCore,
    event_rx: mpsc::Receiver<DispatchEvent>,
    event_tx: mpsc::Sender<DispatchEvent>,
    launcher: L,
}

impl<L: TaskLauncher> fmt::Debug for Dispatcher<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("core", &self.core)
            .field("launcher", &self.launcher)
            .finish_non_exhaustive()
    }
}

impl<L: TaskLauncher> Dispatcher<L> {
    /// `event_tx` must feed `event_rx`; launchers report completions on it.
    pub fn new(
        event_rx: mpsc::Receiver<DispatchEvent>,
        event_tx: mpsc::Sender<DispatchEvent>,
        launcher: L,
    ) -> Self {
        Self {
            core: DispatchCore::new(),
            event_rx,
            event_tx,
            launcher,
        }
    }

    pub async fn run(mut self) -> Result<DispatchCore> {
        info!("watching for changes; press Ctrl-C to stop");

        loop {
            let Some(event) = self.event_rx.recv().await else {
                info!("dispatch channel closed; exiting");
                break;
            };

            debug!(?event, "dispatcher received event");
            let step = self.core.step(event);

            for command in step.commands {
                match command {
                    DispatchCommand::Invoke(task) => {
                        self.launcher.launch(task, self.event_tx.clone())?;
                    }
                }
            }

            if !step.keep_running {
                info!(
                    still_running = self.core.total_in_flight(),
                    "shutdown requested; stopping watch"
                );
                break;
            }
        }

        Ok(self.core)
    }
}
