// src/pipeline/stages/concat.rs

use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;
use crate::pipeline::record::{FileRecord, FileSet};
use crate::pipeline::stage::Stage;
use crate::types::BoxFuture;

/// Joins every record, in order, into one file named `bundle`.
///
/// Contents are separated by a single newline. An empty input produces no
/// bundle at all.
#[derive(Debug, Clone)]
pub struct ConcatStage {
    bundle: String,
}

impl ConcatStage {
    pub fn new(bundle: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
        }
    }
}

impl Stage for ConcatStage {
    fn name(&self) -> &str {
        "concat"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move {
            if files.is_empty() {
                debug!(bundle = %self.bundle, "nothing to concatenate");
                return Ok(Vec::new());
            }

            let joined = files
                .iter()
                .map(|f| f.contents.as_slice())
                .collect::<Vec<_>>()
                .join(&b'\n');

            debug!(
                bundle = %self.bundle,
                inputs = files.len(),
                bytes = joined.len(),
                "concatenated"
            );
            Ok(vec![FileRecord::new(PathBuf::new(), &self.bundle, joined)])
        })
    }
}
