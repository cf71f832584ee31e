// src/pipeline/mod.rs

//! Stream-style file pipelines.
//!
//! A [`Pipeline`] loads the files selected by a [`PatternSet`](crate::patterns::PatternSet)
//! into memory as [`FileRecord`]s, passes the whole sequence through its
//! [`Stage`]s left to right, and writes whatever comes out of the last stage
//! under a destination directory.

pub mod dest;
pub mod record;
pub mod runner;
pub mod source;
pub mod stage;
pub mod stages;

pub use dest::DestinationLocks;
pub use record::{FileRecord, FileSet};
pub use runner::{Pipeline, PipelineReport};
pub use source::load_sources;
pub use stage::Stage;
