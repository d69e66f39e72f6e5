use super::Vfs;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Result;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-Memory File System implementation (for testing)
///
/// Directories are implicit: a directory exists while at least one file lives
/// below it. Clones share the same backing store.
#[derive(Clone, Default, Debug)]
pub struct MemoryVfs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for seeding test trees.
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = Self::normalize_path(path.as_ref());
        self.lock().insert(path, content.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn normalize_path(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => continue,
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }
        if normalized.as_os_str().is_empty() {
            return PathBuf::from(".");
        }
        normalized
    }

    fn has_children(files: &BTreeMap<PathBuf, String>, path: &Path) -> bool {
        files.keys().any(|k| k.starts_with(path) && k != path)
    }
}

impl Vfs for MemoryVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = MemoryVfs::normalize_path(path);
        let files = self.lock();
        files.get(&path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )
        })
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = MemoryVfs::normalize_path(path);
        let files = self.lock();
        !files.contains_key(&path) && MemoryVfs::has_children(&files, &path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let path = MemoryVfs::normalize_path(path);
        self.lock().contains_key(&path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = MemoryVfs::normalize_path(path);
        let files = self.lock();
        if !MemoryVfs::has_children(&files, &path) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {:?}", path),
            ));
        }

        let mut entries = BTreeSet::new();
        for k in files.keys() {
            if let Ok(rest) = k.strip_prefix(&path) {
                if let Some(first) = rest.components().next() {
                    entries.insert(path.join(first));
                }
            }
        }
        Ok(entries.into_iter().collect())
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(MemoryVfs::normalize_path(path))
        } else {
            Ok(MemoryVfs::normalize_path(&Path::new("/").join(path)))
        }
    }
}
