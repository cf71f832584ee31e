// src/dag/mod.rs

//! Tasks and their prerequisites.
//!
//! - [`graph`] holds the [`TaskRegistry`] and turns a task name into an
//!   ordered execution plan.
//! - [`invoker`] runs a plan against a [`TaskContext`](crate::tasks::TaskContext)
//!   and tracks each step's [`TaskRunState`].
//! - [`listing`] renders the registry for `help`.

pub mod graph;
pub mod invoker;
pub mod listing;

pub use graph::{PlanStep, RegisteredTask, TaskBody, TaskRegistry, TaskSpec};
pub use invoker::{InvocationReport, Invoker, StepReport, TaskRunState};
pub use listing::{is_sub_task, ListingEntry, TaskListing};
