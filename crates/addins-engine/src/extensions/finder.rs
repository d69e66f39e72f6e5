//! Directory and file pattern expansion
//!
//! Patterns are `/`-separated. A segment may contain `*`, `?` and `[...]`
//! matched against one file name, `**` matches any number of directories
//! (zero included), `.` and `..` behave as usual.

use addins_common::Vfs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expands patterns relative to a start directory over a [`Vfs`].
#[derive(Debug)]
pub struct DirectoryFinder<'a, V: Vfs + ?Sized> {
    vfs: &'a V,
}

impl<'a, V: Vfs + ?Sized> DirectoryFinder<'a, V> {
    pub fn new(vfs: &'a V) -> Self {
        Self { vfs }
    }

    /// Directories under `start` matching `pattern`, in discovery order and
    /// without duplicates. An empty pattern yields `start` itself.
    pub fn directories(&self, start: &Path, pattern: &str) -> Vec<PathBuf> {
        let mut current = vec![start.to_path_buf()];

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            let mut next = Vec::new();
            match segment {
                "." => next = current,
                ".." => {
                    next = current
                        .iter()
                        .map(|dir| dir.parent().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()))
                        .collect();
                }
                "**" => {
                    let mut seen = HashSet::new();
                    for dir in &current {
                        self.collect_descendants(dir, &mut seen, &mut next);
                    }
                }
                _ if is_pattern(segment) => {
                    for dir in &current {
                        match self.vfs.dirs_matching(dir, segment) {
                            Ok(found) => next.extend(found),
                            Err(e) => debug!("Cannot list {}: {}", dir.display(), e),
                        }
                    }
                }
                _ => {
                    next = current
                        .iter()
                        .map(|dir| dir.join(segment))
                        .filter(|dir| self.vfs.is_dir(dir))
                        .collect();
                }
            }
            current = dedup(next);
        }

        current
    }

    /// Files under `start` matching `pattern`. The last segment matches file
    /// names; everything before it matches directories.
    pub fn files(&self, start: &Path, pattern: &str) -> Vec<PathBuf> {
        let (dir_pattern, file_pattern) = match pattern.rsplit_once('/') {
            Some((dirs, file)) => (dirs, file),
            None => ("", pattern),
        };
        if file_pattern.is_empty() {
            return Vec::new();
        }

        let mut files = Vec::new();
        for dir in self.directories(start, dir_pattern) {
            if is_pattern(file_pattern) {
                match self.vfs.files_matching(&dir, file_pattern) {
                    Ok(found) => files.extend(found),
                    Err(e) => debug!("Cannot list {}: {}", dir.display(), e),
                }
            } else {
                let file = dir.join(file_pattern);
                if self.vfs.is_file(&file) {
                    files.push(file);
                }
            }
        }
        dedup(files)
    }

    fn collect_descendants(&self, dir: &Path, seen: &mut HashSet<PathBuf>, out: &mut Vec<PathBuf>) {
        let identity = self.vfs.absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !seen.insert(identity) {
            return;
        }
        out.push(dir.to_path_buf());

        let children = match self.vfs.list_dir(dir) {
            Ok(children) => children,
            Err(e) => {
                debug!("Cannot list {}: {}", dir.display(), e);
                return;
            }
        };
        let mut children: Vec<_> = children.into_iter().filter(|c| self.vfs.is_dir(c)).collect();
        children.sort();
        for child in children {
            self.collect_descendants(&child, seen, out);
        }
    }
}

/// Whether a path segment or entry contains pattern characters.
pub fn is_pattern(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

/// Split a fully qualified entry into its root and the pattern below it,
/// e.g. `/opt/addins/*.dll` into `/` and `opt/addins/*.dll`.
pub fn split_root(text: &str) -> (PathBuf, &str) {
    let bytes = text.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        return (PathBuf::from(&text[..3]), &text[3..]);
    }
    match text.strip_prefix('/') {
        Some(rest) => (PathBuf::from("/"), rest),
        None => (PathBuf::new(), text),
    }
}

fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}
