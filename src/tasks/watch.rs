// src/tasks/watch.rs

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::{DispatchEvent, Dispatcher, InvokerLauncher};
use crate::errors::Result;
use crate::tasks::TaskContext;
use crate::watch::{build_bindings, spawn_watcher};

/// Re-run the bound task on every matching change until Ctrl-C.
pub async fn watch(ctx: TaskContext) -> Result<()> {
    let bindings = build_bindings(ctx.config().watch_bindings())?;
    let (tx, rx) = mpsc::channel::<DispatchEvent>(256);

    let _watcher = spawn_watcher(ctx.root(), bindings, tx.clone())?;

    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl-C: {e}");
                return;
            }
            let _ = tx.send(DispatchEvent::ShutdownRequested).await;
        });
    }

    let dispatcher = Dispatcher::new(rx, tx, InvokerLauncher::new(ctx.invoker()));
    let core = dispatcher.run().await?;

    info!(
        rebuilds = core.started(),
        failed = core.failed(),
        "watch stopped"
    );
    Ok(())
}
