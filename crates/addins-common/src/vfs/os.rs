use super::Vfs;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

/// OS File System implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct OsVfs;

impl Vfs for OsVfs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    /// Canonicalizes existing paths so symlinked aliases collapse to one
    /// identity; paths that do not exist yet are made absolute lexically.
    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        match fs::canonicalize(path) {
            Ok(canonical) => Ok(canonical),
            Err(_) => std::path::absolute(path),
        }
    }
}
