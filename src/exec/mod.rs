// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the [`ProcessBackend`] trait every task that shells
//!   out goes through, so tests can replace it with a fake implementation.
//! - [`process`] is the production backend built on `tokio::process`.
//! - [`perf`] turns the performance checker's exit code into an outcome.

pub mod backend;
pub mod perf;
pub mod process;

pub use backend::{ProcessBackend, ProcessExit, ProcessSpec};
pub use perf::{classify_perf_exit, PerfOutcome};
pub use process::TokioProcessBackend;
