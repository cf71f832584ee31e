// src/engine/mod.rs

//! Watch-mode dispatch engine.
//!
//! Triggers from the file watcher and completions from running invocations
//! flow in as [`DispatchEvent`]s. The pure core in [`core`] decides what to
//! do; the async shell in [`runtime`] does it through a
//! [`TaskLauncher`](launcher::TaskLauncher).

use crate::types::TaskName;

/// Events flowing into the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A watched file changed; `path` is relative to the project root.
    Triggered { task: TaskName, path: String },
    /// An invocation started by the dispatcher ended.
    Finished { task: TaskName, ok: bool },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod launcher;
pub mod runtime;

pub use core::{DispatchCommand, DispatchCore, DispatchStep};
pub use launcher::{InvokerLauncher, TaskLauncher};
pub use runtime::Dispatcher;
