// src/pipeline/source.rs

//! Loading pipeline inputs from the filesystem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::patterns::PatternSet;
use crate::pipeline::record::{slash_path, FileRecord, FileSet};

/// Read every file selected by `patterns` under `root`.
///
/// Globs are expanded in the order they are listed. Within one glob, files
/// are sorted by path so repeated runs see the same order. A file matched by
/// more than one glob is loaded once, at its first position. A glob that
/// matches nothing contributes nothing.
pub fn load_sources(fs: &dyn FileSystem, root: &Path, patterns: &PatternSet) -> Result<FileSet> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for glob in patterns.includes() {
        let mut matched = Vec::new();

        if glob.is_literal() {
            let path = root.join(glob.pattern());
            if fs.is_file(&path) && !patterns.is_excluded(glob.pattern()) {
                matched.push(PathBuf::from(glob.pattern()));
            }
        } else {
            let start = root.join(glob.base());
            if fs.is_dir(&start) {
                let mut files = Vec::new();
                walk(fs, &start, &mut files)?;

                for file in files {
                    let Some(rel) = relative_to(&file, root) else {
                        continue;
                    };
                    let rel_str = slash_path(&rel);
                    if glob.is_match(&rel_str) && !patterns.is_excluded(&rel_str) {
                        matched.push(rel);
                    }
                }
            } else {
                debug!(pattern = %glob.pattern(), base = ?start, "glob base directory missing");
            }
        }

        matched.sort();

        for rel in matched {
            let key = slash_path(&rel);
            if !seen.insert(key.clone()) {
                continue;
            }

            let contents = fs.read(&root.join(&rel))?;
            let relative = rel
                .strip_prefix(glob.base())
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| rel.clone());

            trace!(path = %key, bytes = contents.len(), "loaded source");
            records.push(FileRecord::new(glob.base(), relative, contents));
        }
    }

    Ok(records)
}

/// Symlinked directories are not descended into, so a link loop cannot
/// recurse forever. Symlinked files are read like any other file.
fn walk(fs: &dyn FileSystem, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs.read_dir(dir)? {
        if fs.is_dir(&entry) {
            if fs.is_symlink(&entry) {
                debug!(path = ?entry, "skipping symlinked directory");
                continue;
            }
            walk(fs, &entry, out)?;
        } else if fs.is_file(&entry) {
            out.push(entry);
        }
    }
    Ok(())
}

fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}
