// src/watch/event_handler.rs

//! Turning raw `notify` events into task triggers.

use std::path::Path;

use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::DispatchEvent;
use crate::watch::binding::{matching_tasks, WatchBinding};
use crate::watch::path_utils::relative_str;

/// Whether an event can change file contents. Reads and metadata-only
/// access are ignored.
pub fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}

/// Send one `Triggered` event per (changed path, matching binding) pair.
///
/// Returns how many triggers were sent.
pub async fn dispatch_event(
    root: &Path,
    event: &Event,
    bindings: &[WatchBinding],
    tx: &mpsc::Sender<DispatchEvent>,
) -> usize {
    if !is_relevant(&event.kind) {
        return 0;
    }

    let mut sent = 0;
    for path in &event.paths {
        let Some(rel) = relative_str(root, path) else {
            warn!("could not relativize path {:?} against root {:?}", path, root);
            continue;
        };

        for task in matching_tasks(bindings, &rel) {
            debug!(task, path = %rel, "change matched watch binding");
            let trigger = DispatchEvent::Triggered {
                task: task.to_string(),
                path: rel.clone(),
            };
            if tx.send(trigger).await.is_err() {
                debug!("dispatcher gone; dropping trigger");
                return sent;
            }
            sent += 1;
        }
    }
    sent
}
