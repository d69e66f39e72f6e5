//! Candidate module discovery
//!
//! Walks extension directories, following `.addins` manifests where present
//! and falling back to every library file otherwise, and registers each
//! module the host can load with the candidate tracker.

use crate::error::{EngineError, Result};
use crate::extensions::finder::{split_root, DirectoryFinder};
use crate::extensions::manager::ExtensionManager;
use crate::extensions::manifest::{ManifestEntry, ManifestFile, MANIFEST_PATTERN};
use crate::extensions::tracker::CandidateModule;
use crate::extensions::PACKAGE_MARKER;
use crate::runtime::can_load;
use addins_common::Vfs;
use addins_metadata::{MetadataError, MetadataReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

impl<V: Vfs, R: MetadataReader> ExtensionManager<V, R> {
    /// Find candidate modules starting from `start_dir`, following any
    /// manifests found there. A directory already supplied is ignored.
    pub fn find_extension_modules(&mut self, start_dir: impl AsRef<Path>) -> Result<()> {
        let start_dir = start_dir.as_ref();
        let start_dir = self
            .vfs
            .absolute(start_dir)
            .map_err(|source| EngineError::access(start_dir, source))?;
        if self.extension_directories.contains(&start_dir) {
            debug!("Extension directory {} already examined", start_dir.display());
            return Ok(());
        }
        self.extension_directories.push(start_dir.clone());

        info!("Examining extension directory {}", start_dir.display());
        self.process_directory(&start_dir, false)
    }

    /// Find candidate modules in the conventional locations around a host
    /// module: every directory matching the host patterns, relative to the
    /// host's directory and to each of its ancestors.
    pub fn find_extension_modules_for_host(&mut self, host_module: impl AsRef<Path>) -> Result<()> {
        let host_module = host_module.as_ref();
        let host_module = self
            .vfs
            .absolute(host_module)
            .map_err(|source| EngineError::access(host_module, source))?;
        info!("Finding extension modules for host {}", host_module.display());

        let Some(host_dir) = host_module.parent() else {
            return Ok(());
        };

        let patterns = if self.vfs.is_file(&host_dir.join(PACKAGE_MARKER)) {
            debug!("Host was installed by a package manager");
            self.options.package_host_patterns.clone()
        } else {
            self.options.host_patterns.clone()
        };

        for dir in host_dir.ancestors() {
            for pattern in &patterns {
                let matches = DirectoryFinder::new(&self.vfs).directories(dir, pattern);
                for found in matches {
                    self.process_directory(&found, true)?;
                }
            }
        }
        Ok(())
    }

    /// Scan one directory. Manifests direct the search when present;
    /// otherwise every library file is a candidate.
    pub(crate) fn process_directory(&mut self, dir: &Path, from_wildcard: bool) -> Result<()> {
        let dir = self
            .vfs
            .absolute(dir)
            .map_err(|source| EngineError::access(dir, source))?;
        if !self.visited.insert((dir.clone(), from_wildcard)) {
            warn!("Skipping directory {} because it was already visited", dir.display());
            return Ok(());
        }

        info!("Scanning directory {} for extensions", dir.display());

        let manifests = self
            .vfs
            .files_matching(&dir, MANIFEST_PATTERN)
            .map_err(|source| EngineError::access(&dir, source))?;
        for manifest in &manifests {
            self.process_manifest(manifest, from_wildcard)?;
        }

        if manifests.is_empty() {
            let mut libraries = Vec::new();
            for pattern in &self.options.library_patterns {
                let matches = self
                    .vfs
                    .files_matching(&dir, pattern)
                    .map_err(|source| EngineError::access(&dir, source))?;
                libraries.extend(matches);
            }
            libraries.sort();
            libraries.dedup();

            for library in libraries {
                self.process_candidate_module(&library, true)?;
            }
        }
        Ok(())
    }

    fn process_manifest(&mut self, path: &Path, from_wildcard: bool) -> Result<()> {
        info!("Processing manifest {}", path.display());
        let manifest = ManifestFile::read(&self.vfs, path)?;

        for entry in manifest.entries() {
            debug!("Processing entry {}: {}", entry.line_number, entry.text);
            let is_wild = from_wildcard || entry.is_pattern;

            if entry.is_directory {
                for dir in self.matching_directories(manifest.directory(), &entry) {
                    self.process_directory(&dir, is_wild)?;
                }
            } else {
                for file in self.matching_files(manifest.directory(), &entry) {
                    self.process_candidate_module(&file, is_wild)?;
                }
            }
        }
        Ok(())
    }

    fn matching_directories(&self, base: &Path, entry: &ManifestEntry) -> Vec<PathBuf> {
        let finder = DirectoryFinder::new(&self.vfs);
        if entry.is_fully_qualified {
            let (root, pattern) = split_root(&entry.text);
            finder.directories(&root, pattern)
        } else {
            finder.directories(base, &entry.text)
        }
    }

    fn matching_files(&self, base: &Path, entry: &ManifestEntry) -> Vec<PathBuf> {
        let finder = DirectoryFinder::new(&self.vfs);
        if entry.is_fully_qualified {
            let (root, pattern) = split_root(&entry.text);
            finder.files(&root, pattern)
        } else {
            finder.files(base, &entry.text)
        }
    }

    /// Track a module if the host can load it.
    ///
    /// Unreadable modules are ignored when they were found through a
    /// pattern and reported when they were named literally.
    pub(crate) fn process_candidate_module(&mut self, path: &Path, from_wildcard: bool) -> Result<()> {
        debug!("Processing candidate module {}", path.display());

        if self.tracker.contains_path(path) {
            debug!("  Skipping module already processed");
            return Ok(());
        }

        let header = match self.reader.read_header(path) {
            Ok(header) => header,
            Err(source) => return skip_unreadable(path, from_wildcard, source),
        };

        if !can_load(self.host.runtime.as_ref(), header.target_runtime.as_ref(), path)? {
            debug!("  Host cannot load this module");
            return Ok(());
        }

        self.tracker
            .add_or_update(CandidateModule::new(path, from_wildcard, header));
        Ok(())
    }
}

/// Swallow a read failure for wildcard discoveries, surface it otherwise.
pub(crate) fn skip_unreadable(path: &Path, from_wildcard: bool, source: MetadataError) -> Result<()> {
    if from_wildcard {
        debug!("  Ignoring unreadable module {}: {}", path.display(), source);
        return Ok(());
    }
    Err(EngineError::UnreadableModule {
        path: path.to_path_buf(),
        source,
    })
}
