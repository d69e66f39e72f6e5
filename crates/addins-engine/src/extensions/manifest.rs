//! `.addins` manifest files
//!
//! A manifest lists, one per line, the files and directories to consider
//! for extensions. Blank lines and lines starting with `#` are ignored.
//! A trailing `/` marks a directory; `*`, `?` and `[` mark a pattern.
//!
//! ```text
//! # Reporting extensions
//! reporting/Vendor.Reporting.dll
//! drivers/**/
//! /opt/shared/addins/*.dll
//! ```

use crate::error::{EngineError, Result};
use addins_common::Vfs;
use std::path::{Path, PathBuf};

/// File name pattern identifying manifest files.
pub const MANIFEST_PATTERN: &str = "*.addins";

const PATTERN_CHARS: [char; 3] = ['*', '?', '['];

/// One meaningful line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number in the manifest
    pub line_number: usize,
    /// Trimmed text with `\` normalized to `/`
    pub text: String,
    /// Entry names directories rather than files
    pub is_directory: bool,
    /// Entry contains pattern characters
    pub is_pattern: bool,
    /// Entry is an absolute path
    pub is_fully_qualified: bool,
}

impl ManifestEntry {
    /// Classify one line. Returns `None` for blank and comment lines.
    pub fn parse(line_number: usize, line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let text = line.replace('\\', "/");
        Some(Self {
            line_number,
            is_directory: text.ends_with('/'),
            is_pattern: text.contains(PATTERN_CHARS),
            is_fully_qualified: is_fully_qualified(&text),
            text,
        })
    }
}

fn is_fully_qualified(text: &str) -> bool {
    if text.starts_with('/') || Path::new(text).is_absolute() {
        return true;
    }
    // Drive-qualified paths such as `C:/addins`
    let bytes = text.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// A manifest file and its content.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
    content: String,
}

impl ManifestFile {
    /// Read a manifest through the file system.
    pub fn read<V: Vfs + ?Sized>(vfs: &V, path: &Path) -> Result<Self> {
        let content = vfs
            .read_to_string(path)
            .map_err(|source| EngineError::access(path, source))?;
        Ok(Self::parse(path, content))
    }

    pub fn parse(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative entries resolve against
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Entries in file order. Each call starts a fresh pass.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry> + '_ {
        self.content
            .lines()
            .enumerate()
            .filter_map(|(index, line)| ManifestEntry::parse(index + 1, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addins_common::MemoryVfs;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let manifest = ManifestFile::parse(
            "/app/addins/main.addins",
            "# comment\n\n   \nfirst.dll\n  # indented comment\nsecond.dll\n",
        );
        let entries: Vec<_> = manifest.entries().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first.dll");
        assert_eq!(entries[0].line_number, 4);
        assert_eq!(entries[1].text, "second.dll");
        assert_eq!(entries[1].line_number, 6);
    }

    #[test]
    fn test_classification() {
        let manifest = ManifestFile::parse(
            "/app/main.addins",
            "drivers/\nreporting\\*.dll\n/opt/shared/Vendor.dll\nplugins/**/\nC:\\addins\\x.dll\nnot?here.dll\n[ab].dll\n",
        );
        let entries: Vec<_> = manifest.entries().collect();

        assert!(entries[0].is_directory);
        assert!(!entries[0].is_pattern);
        assert!(!entries[0].is_fully_qualified);

        assert_eq!(entries[1].text, "reporting/*.dll");
        assert!(!entries[1].is_directory);
        assert!(entries[1].is_pattern);

        assert!(entries[2].is_fully_qualified);
        assert!(!entries[2].is_pattern);

        assert!(entries[3].is_directory);
        assert!(entries[3].is_pattern);

        assert_eq!(entries[4].text, "C:/addins/x.dll");
        assert!(entries[4].is_fully_qualified);

        assert!(entries[5].is_pattern);
        assert!(entries[6].is_pattern);
    }

    #[test]
    fn test_entries_restart() {
        let manifest = ManifestFile::parse("/app/main.addins", "a.dll\nb.dll");
        assert_eq!(manifest.entries().count(), 2);
        assert_eq!(manifest.entries().count(), 2);
        assert_eq!(manifest.directory(), Path::new("/app"));
    }

    #[test]
    fn test_read_through_vfs() {
        let vfs = MemoryVfs::new().with_file("/app/main.addins", "drivers/\n");
        let manifest = ManifestFile::read(&vfs, Path::new("/app/main.addins")).unwrap();
        let entry = manifest.entries().next().unwrap();
        assert_eq!(entry.text, "drivers/");
        assert!(ManifestFile::read(&vfs, Path::new("/app/missing.addins")).is_err());
    }
}
