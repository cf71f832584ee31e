// src/pipeline/stage.rs

use std::fmt::Debug;

use crate::errors::Result;
use crate::pipeline::record::FileSet;
use crate::types::BoxFuture;

/// One transformation step in a [`Pipeline`](crate::pipeline::Pipeline).
///
/// A stage receives the whole record sequence produced by the previous step
/// and returns a new one. Returning an error aborts the pipeline; later
/// stages do not run and nothing is written.
pub trait Stage: Send + Sync + Debug {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>>;
}
