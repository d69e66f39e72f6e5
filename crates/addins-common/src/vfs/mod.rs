use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

/// Virtual File System trait
///
/// Abstraction over the file-system operations extension discovery needs:
/// - OS file system
/// - In-memory file system (for testing)
///
/// # Contract
///
/// - **`is_dir(path)`** / **`is_file(path)`**: mutually exclusive; both are
///   `false` for a missing path.
/// - **`list_dir(path)`**: immediate children only, as full paths. Fails if
///   the path is not a directory.
/// - **`absolute(path)`**: the identity used for deduplication. Two aliases of
///   the same directory must map to the same absolute path where the backing
///   store can tell.
pub trait Vfs {
    /// Read a file to a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a path is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// List the immediate entries of a directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Resolve a path to its absolute, normalized form.
    fn absolute(&self, path: &Path) -> Result<PathBuf>;

    /// Files directly inside `dir` whose file name matches `pattern`,
    /// sorted by path.
    fn files_matching(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        entries_matching(self, dir, pattern, |path| self.is_file(path))
    }

    /// Directories directly inside `dir` whose name matches `pattern`,
    /// sorted by path.
    fn dirs_matching(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        entries_matching(self, dir, pattern, |path| self.is_dir(path))
    }
}

fn entries_matching<V: Vfs + ?Sized>(
    vfs: &V,
    dir: &Path,
    pattern: &str,
    keep: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    let pattern =
        glob::Pattern::new(pattern).map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
    let mut entries: Vec<PathBuf> = vfs
        .list_dir(dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
        })
        .filter(|path| keep(path))
        .collect();
    entries.sort();
    Ok(entries)
}

// Re-export implementations
pub use memory::MemoryVfs;
pub use os::OsVfs;

mod memory;
mod os;
