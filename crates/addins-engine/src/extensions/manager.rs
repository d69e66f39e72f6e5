//! Extension manager
//!
//! Owns the extension point registry, the candidate tracker and the
//! discovery state, and exposes the query surface hosts use. Extension data
//! is loaded once, on first access.

use crate::error::{EngineError, Result};
use crate::extensions::activation::{Activator, Contract};
use crate::extensions::node::ExtensionNode;
use crate::extensions::point::ExtensionPoint;
use crate::extensions::registry::ExtensionPointRegistry;
use crate::extensions::tracker::CandidateTracker;
use crate::host::HostInfo;
use addins_common::config::{AddinsConfig, DiscoverySection};
use addins_common::{OsVfs, Vfs};
use addins_metadata::{JsonMetadataReader, MetadataReader, ModuleMetadata};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File patterns used while scanning directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Library files considered when a directory has no manifest
    pub library_patterns: Vec<String>,
    /// Sibling-directory patterns for host-relative discovery
    pub host_patterns: Vec<String>,
    /// Host-relative patterns used for package-manager installs
    pub package_host_patterns: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&DiscoverySection::default())
    }
}

impl From<&DiscoverySection> for DiscoveryOptions {
    fn from(section: &DiscoverySection) -> Self {
        Self {
            library_patterns: section.library_patterns.clone(),
            host_patterns: section.host_patterns.clone(),
            package_host_patterns: section.package_host_patterns.clone(),
        }
    }
}

/// Discovers, tracks and loads extensions for one host.
#[derive(Debug)]
pub struct ExtensionManager<V: Vfs = OsVfs, R: MetadataReader = JsonMetadataReader<OsVfs>> {
    pub(crate) vfs: V,
    pub(crate) reader: R,
    pub(crate) host: HostInfo,
    pub(crate) options: DiscoveryOptions,
    pub(crate) registry: ExtensionPointRegistry,
    pub(crate) tracker: CandidateTracker,
    /// (directory, from_wildcard) pairs already scanned
    pub(crate) visited: HashSet<(PathBuf, bool)>,
    /// Explicit roots already supplied
    pub(crate) extension_directories: Vec<PathBuf>,
    pub(crate) extensions_loaded: bool,
}

impl ExtensionManager {
    /// Manager over the OS file system and JSON metadata descriptors
    pub fn new(host: HostInfo) -> Self {
        Self::with_vfs(OsVfs, host)
    }

    /// Build a manager from configuration and run the configured discovery.
    pub fn from_config(config: &AddinsConfig) -> Result<Self> {
        let mut manager =
            Self::new(HostInfo::from_config(&config.host)?).with_options((&config.discovery).into());
        manager.apply_config(config)?;
        Ok(manager)
    }
}

impl<V: Vfs + Clone> ExtensionManager<V, JsonMetadataReader<V>> {
    /// Manager reading JSON metadata descriptors through `vfs`
    pub fn with_vfs(vfs: V, host: HostInfo) -> Self {
        let reader = JsonMetadataReader::new(vfs.clone());
        Self::with_reader(vfs, reader, host)
    }
}

impl<V: Vfs, R: MetadataReader> ExtensionManager<V, R> {
    pub fn with_reader(vfs: V, reader: R, host: HostInfo) -> Self {
        Self {
            vfs,
            reader,
            host,
            options: DiscoveryOptions::default(),
            registry: ExtensionPointRegistry::new(),
            tracker: CandidateTracker::new(),
            visited: HashSet::new(),
            extension_directories: Vec::new(),
            extensions_loaded: false,
        }
    }

    pub fn with_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }

    /// Run the discovery a configuration describes: point modules, explicit
    /// directories, then host-relative directories. Types listed under
    /// `[extensions] disabled` are disabled afterwards, which loads extensions.
    pub fn apply_config(&mut self, config: &AddinsConfig) -> Result<()> {
        self.find_extension_points(config.discovery.points.as_slice())?;

        for dir in &config.discovery.directories {
            self.find_extension_modules(dir)?;
        }

        if let Some(module) = &config.host.module {
            self.find_extension_modules_for_host(module)?;
        }

        for type_name in &config.extensions.disabled {
            if self.enable_extension(type_name, false)? == 0 {
                warn!("No installed extension is implemented by {}", type_name);
            }
        }
        Ok(())
    }

    // Extension points

    /// Scan modules for extension point declarations.
    pub fn find_extension_points<P: AsRef<Path>>(&mut self, modules: &[P]) -> Result<()> {
        for module in modules {
            let path = module.as_ref();
            let metadata = self
                .reader
                .read_module(path)
                .map_err(|source| EngineError::UnreadableModule {
                    path: path.to_path_buf(),
                    source,
                })?;
            self.registry.register_module(path, &metadata)?;
        }
        Ok(())
    }

    /// Register the extension points declared by already-read metadata.
    pub fn find_extension_points_in(&mut self, module_path: &Path, metadata: &ModuleMetadata) -> Result<usize> {
        self.registry.register_module(module_path, metadata)
    }

    /// All extension points, in declaration order
    pub fn extension_points(&self) -> &[ExtensionPoint] {
        self.registry.points()
    }

    pub fn extension_point(&self, path: &str) -> Option<&ExtensionPoint> {
        self.registry.lookup_by_path(path)
    }

    /// First extension point whose contract is `contract`
    pub fn extension_point_for(&self, contract: &str) -> Option<&ExtensionPoint> {
        self.registry.lookup_by_contract(contract)
    }

    pub fn extension_point_for_contract<C: Contract + ?Sized>(&self) -> Option<&ExtensionPoint> {
        self.extension_point_for(C::TYPE_NAME)
    }

    pub fn registry(&self) -> &ExtensionPointRegistry {
        &self.registry
    }

    // Extensions

    /// Every installed extension, in installation order
    pub fn extensions(&mut self) -> Result<impl Iterator<Item = &ExtensionNode>> {
        self.load_extensions()?;
        Ok(self.registry.installed())
    }

    /// All nodes installed under the point at `path`; empty for unknown paths
    pub fn extension_nodes(&mut self, path: &str) -> Result<&[ExtensionNode]> {
        self.load_extensions()?;
        Ok(self
            .registry
            .lookup_by_path(path)
            .map(ExtensionPoint::extensions)
            .unwrap_or_default())
    }

    /// First node installed under the point at `path`
    pub fn extension_node(&mut self, path: &str) -> Result<Option<&ExtensionNode>> {
        Ok(self.extension_nodes(path)?.first())
    }

    /// Nodes of the point whose contract is `contract`. Disabled nodes are
    /// included only when asked for.
    pub fn extension_nodes_for_contract(
        &mut self,
        contract: &str,
        include_disabled: bool,
    ) -> Result<Vec<&ExtensionNode>> {
        self.load_extensions()?;

        let Some(point) = self.registry.lookup_by_contract(contract) else {
            debug!("No extension point has contract {}", contract);
            return Ok(Vec::new());
        };

        Ok(point
            .extensions()
            .iter()
            .filter(|node| include_disabled || node.enabled())
            .collect())
    }

    pub fn extension_nodes_for<C: Contract + ?Sized>(
        &mut self,
        include_disabled: bool,
    ) -> Result<Vec<&ExtensionNode>> {
        self.extension_nodes_for_contract(C::TYPE_NAME, include_disabled)
    }

    /// Objects for every enabled extension of contract `C`, built by `activator`
    pub fn extensions_for<C, A>(&mut self, activator: &A) -> Result<Vec<Box<C>>>
    where
        C: Contract + ?Sized,
        A: Activator<C> + ?Sized,
    {
        self.extension_nodes_for::<C>(false)?
            .into_iter()
            .map(|node| activator.activate(node))
            .collect()
    }

    /// Enable or disable every extension implemented by `type_name`.
    /// Returns how many extensions matched.
    pub fn enable_extension(&mut self, type_name: &str, enabled: bool) -> Result<usize> {
        self.load_extensions()?;
        let matched = self.registry.set_enabled(type_name, enabled);
        debug!(
            "Set enabled={} on {} extension(s) of type {}",
            enabled, matched, type_name
        );
        Ok(matched)
    }

    /// Whether the one-time load has started
    pub fn is_loaded(&self) -> bool {
        self.extensions_loaded
    }

    /// Load extensions from every tracked candidate. Runs at most once.
    pub fn load_extensions(&mut self) -> Result<()> {
        if self.extensions_loaded {
            return Ok(());
        }
        self.extensions_loaded = true;

        info!("Loading extensions from {} candidate(s)", self.tracker.len());
        self.find_extensions_in_candidates()
    }

    // Candidates

    /// Tracked candidate modules
    pub fn candidates(&self) -> &CandidateTracker {
        &self.tracker
    }

    /// Release the metadata held by candidates.
    pub fn dispose(&mut self) {
        self.tracker.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::EXTENSION_POINT_ATTRIBUTE;
    use addins_common::MemoryVfs;
    use addins_metadata::Version;

    fn manager() -> ExtensionManager<MemoryVfs, JsonMetadataReader<MemoryVfs>> {
        let vfs = MemoryVfs::new()
            .with_file("/app/Host.dll", "")
            .with_file(
                "/app/Host.dll.metadata.json",
                r#"{
                    "name": "Host",
                    "version": "1.0",
                    "attributes": [
                        { "type_name": "Addins.ExtensionPointAttribute", "args": ["/Host/Drivers", "Host.IDriver"] }
                    ]
                }"#,
            );
        ExtensionManager::with_vfs(vfs, HostInfo::new(Version::major_minor(1, 0)))
    }

    #[test]
    fn test_find_extension_points() {
        let mut manager = manager();
        manager.find_extension_points(&["/app/Host.dll"]).unwrap();

        assert_eq!(manager.extension_points().len(), 1);
        assert!(manager.extension_point("/Host/Drivers").is_some());
        assert_eq!(
            manager.extension_point_for("Host.IDriver").map(|p| p.path()),
            Some("/Host/Drivers")
        );
        assert!(!manager.is_loaded());
    }

    #[test]
    fn test_unreadable_point_module() {
        let mut manager = manager();
        let err = manager
            .find_extension_points(&["/app/Missing.dll"])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnreadableModule { .. }));
    }

    #[test]
    fn test_find_extension_points_in_metadata() {
        let mut manager = manager();
        let metadata = ModuleMetadata {
            header: addins_metadata::ModuleHeader {
                name: "Embedded".to_string(),
                version: Version::major_minor(1, 0),
                target_runtime: None,
            },
            attributes: vec![
                addins_metadata::Attribute::new(EXTENSION_POINT_ATTRIBUTE)
                    .with_named("Path", "/Host/Listeners")
                    .with_named("Type", "Host.IListener"),
            ],
            types: Vec::new(),
        };
        assert_eq!(
            manager
                .find_extension_points_in(Path::new("/app/Embedded.dll"), &metadata)
                .unwrap(),
            1
        );
        assert!(manager.extension_point("/Host/Listeners").is_some());
    }

    #[test]
    fn test_queries_on_empty_manager_load_once() {
        let mut manager = manager();
        assert_eq!(manager.extensions().unwrap().count(), 0);
        assert!(manager.is_loaded());
        assert!(manager.extension_nodes("/Host/Drivers").unwrap().is_empty());
        assert!(manager.extension_node("/Host/Drivers").unwrap().is_none());
        assert!(manager
            .extension_nodes_for_contract("Host.IDriver", true)
            .unwrap()
            .is_empty());
        assert_eq!(manager.enable_extension("Vendor.X", false).unwrap(), 0);
    }
}
