//! Candidate module tracking
//!
//! Every module that might contribute extensions is tracked once, keyed by
//! its absolute path and by its logical module name. When the same module is
//! found twice, the more authoritative discovery wins.

use addins_metadata::{MetadataReader, ModuleHeader, ModuleMetadata, Version};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A module that may contribute extensions.
#[derive(Debug, Clone)]
pub struct CandidateModule {
    path: PathBuf,
    from_wildcard: bool,
    header: ModuleHeader,
    metadata: Option<ModuleMetadata>,
}

impl CandidateModule {
    pub fn new(path: impl Into<PathBuf>, from_wildcard: bool, header: ModuleHeader) -> Self {
        Self {
            path: path.into(),
            from_wildcard,
            header,
            metadata: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Found through a pattern rather than named literally
    pub fn from_wildcard(&self) -> bool {
        self.from_wildcard
    }

    pub fn header(&self) -> &ModuleHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    /// Whether the full metadata is currently held
    pub fn is_loaded(&self) -> bool {
        self.metadata.is_some()
    }

    /// Full metadata, read on first use and cached.
    pub fn metadata<R: MetadataReader + ?Sized>(
        &mut self,
        reader: &R,
    ) -> addins_metadata::Result<&ModuleMetadata> {
        let metadata = match self.metadata.take() {
            Some(metadata) => metadata,
            None => {
                debug!("Reading metadata of {}", self.path.display());
                reader.read_module(&self.path)?
            }
        };
        Ok(self.metadata.insert(metadata))
    }

    /// Release the cached metadata.
    pub fn dispose(&mut self) {
        self.metadata = None;
    }

    /// Whether this discovery should replace `existing`.
    ///
    /// A different module version decides on its own. At equal versions a
    /// wildcard discovery never replaces a literal one.
    pub fn supersedes(&self, existing: &CandidateModule) -> bool {
        if self.version() != existing.version() {
            return self.version() > existing.version();
        }
        !(self.from_wildcard && !existing.from_wildcard)
    }
}

/// Insertion-ordered, deduplicating collection of candidates.
#[derive(Debug, Default)]
pub struct CandidateTracker {
    modules: IndexMap<PathBuf, CandidateModule>,
    by_name: HashMap<String, PathBuf>,
}

impl CandidateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a candidate.
    ///
    /// A candidate sharing a path or logical name with a tracked one replaces
    /// it in place when it supersedes it, and is dropped otherwise. Returns
    /// whether the candidate was stored.
    pub fn add_or_update(&mut self, candidate: CandidateModule) -> bool {
        let existing_path = if self.modules.contains_key(candidate.path()) {
            Some(candidate.path().to_path_buf())
        } else {
            self.by_name.get(candidate.name()).cloned()
        };

        let Some(existing_path) = existing_path else {
            debug!("Tracking candidate {}", candidate.path().display());
            self.by_name
                .insert(candidate.name().to_string(), candidate.path().to_path_buf());
            self.modules.insert(candidate.path().to_path_buf(), candidate);
            return true;
        };

        let Some(index) = self.modules.get_index_of(&existing_path) else {
            return false;
        };
        let existing = &self.modules[index];
        if !candidate.supersedes(existing) {
            debug!(
                "Keeping {} over {}",
                existing.path().display(),
                candidate.path().display()
            );
            return false;
        }

        debug!(
            "Replacing {} with {}",
            existing.path().display(),
            candidate.path().display()
        );
        let old_name = existing.name().to_string();
        if self.by_name.get(&old_name) == Some(&existing_path) {
            self.by_name.remove(&old_name);
        }
        self.by_name
            .insert(candidate.name().to_string(), candidate.path().to_path_buf());

        if existing_path == candidate.path() {
            self.modules[index] = candidate;
        } else {
            // Keep the replaced entry's position under the new key
            let (new_index, _) = self
                .modules
                .insert_full(candidate.path().to_path_buf(), candidate);
            self.modules.swap_indices(index, new_index);
            self.modules.pop();
        }
        true
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    pub fn get_by_path(&self, path: &Path) -> Option<&CandidateModule> {
        self.modules.get(path)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&CandidateModule> {
        self.by_name.get(name).and_then(|path| self.modules.get(path))
    }

    /// Candidates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CandidateModule> {
        self.modules.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CandidateModule> {
        self.modules.values_mut()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Release every candidate's cached metadata.
    pub fn dispose(&mut self) {
        for candidate in self.modules.values_mut() {
            candidate.dispose();
        }
    }
}

impl Drop for CandidateTracker {
    fn drop(&mut self) {
        self.dispose();
    }
}
