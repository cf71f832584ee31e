// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::DispatchEvent;
use crate::watch::binding::WatchBinding;
use crate::watch::event_handler::dispatch_event;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and send [`DispatchEvent::Triggered`] for every
/// change a binding matches.
///
/// There is no debouncing: an editor that writes a file twice produces two
/// triggers.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    dispatch_tx: mpsc::Sender<DispatchEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // notify calls back on its own thread; hop into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("sitebuild: failed to forward notify event: {err}");
                }
            }
            Err(err) => eprintln!("sitebuild: file watch error: {err}"),
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    let tasks: Vec<&str> = bindings.iter().map(WatchBinding::task).collect();
    info!(?tasks, "watching {:?}", root);

    let bindings = Arc::new(bindings);
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            dispatch_event(&root, &event, &bindings, &dispatch_tx).await;
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
