// src/watch/mod.rs

//! File watching.
//!
//! Compiles `[[watch]]` bindings, runs a cross-platform watcher (`notify`),
//! and turns each change under the project root into one
//! [`DispatchEvent::Triggered`](crate::engine::DispatchEvent) per binding it
//! matches. It does not run anything itself; the
//! [`Dispatcher`](crate::engine::Dispatcher) does.

pub mod binding;
pub mod event_handler;
pub mod path_utils;
pub mod watcher;

pub use binding::{build_bindings, matching_tasks, WatchBinding};
pub use event_handler::dispatch_event;
pub use watcher::{spawn_watcher, WatcherHandle};
