// src/watch/path_utils.rs

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Tries a plain `strip_prefix` first, then the canonical forms of both
/// paths (macOS reports `/private/var/...` for `/var/...`). A path that was
/// just deleted cannot be canonicalized, so its parent is tried as well.
///
/// Returns `None` if the path cannot be related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root_canon = root.canonicalize().ok()?;

    if let Ok(path_canon) = path.canonicalize() {
        return path_canon.strip_prefix(&root_canon).ok().map(to_slash);
    }

    let parent = path.parent()?.canonicalize().ok()?;
    let name = path.file_name()?;
    parent
        .join(name)
        .strip_prefix(&root_canon)
        .ok()
        .map(to_slash)
}

fn to_slash(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root_prefix() {
        let root = Path::new("/site");
        assert_eq!(
            relative_str(root, Path::new("/site/_sass/main.scss")).as_deref(),
            Some("_sass/main.scss")
        );
    }

    #[test]
    fn deleted_files_still_relativize() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.scss");
        assert_eq!(relative_str(dir.path(), &gone).as_deref(), Some("gone.scss"));
    }

    #[test]
    fn unrelated_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        assert_eq!(relative_str(dir.path(), &other.path().join("x.js")), None);
    }
}
