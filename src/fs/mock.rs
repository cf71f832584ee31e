// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // child names
}

/// In-memory filesystem. Paths are used verbatim as keys, so tests should
/// stick to one spelling (e.g. always `./css/main.css`).
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

fn parent_key(path: &Path) -> Option<&Path> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        Some(Path::new("."))
    } else {
        Some(parent)
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A poisoned mock only happens after a panicking test; keep going.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        entries.insert(path.clone(), MockEntry::File(content.into()));
        Self::link_into_parent(&mut entries, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        Self::ensure_dir_entry(&mut entries, path.as_ref());
    }

    /// Names of all files currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let entries = self.lock();
        let mut files: Vec<PathBuf> = entries
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File(_)))
            .map(|(p, _)| p.clone())
            .collect();
        files.sort();
        files
    }

    fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = parent_key(path) else {
            return;
        };
        if parent == path {
            return;
        }

        Self::ensure_dir_entry(entries, parent);
        if let (Some(MockEntry::Dir(children)), Some(name)) = (
            entries.get_mut(parent),
            path.file_name().and_then(|n| n.to_str()),
        ) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_into_parent(entries, path);
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if matches!(self.lock().get(path), Some(MockEntry::Dir(_))) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::File(_)) => {}
            Some(MockEntry::Dir(_)) => return Err(anyhow!("Is a directory: {:?}", path)),
            None => return Err(anyhow!("File not found: {:?}", path)),
        }
        entries.remove(path);

        if let (Some(parent), Some(name)) = (
            parent_key(path),
            path.file_name().and_then(|n| n.to_str()),
        ) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
