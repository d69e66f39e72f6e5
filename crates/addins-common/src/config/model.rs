use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration from addins.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AddinsConfig {
    /// The running host
    #[serde(default)]
    pub host: HostSection,

    /// Where to look for extension points and candidate modules
    #[serde(default)]
    pub discovery: DiscoverySection,

    /// Post-load adjustments to installed extensions
    #[serde(default)]
    pub extensions: ExtensionsSection,
}

/// [host] section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostSection {
    /// Runtime identifier of the host, e.g. `core@8.0`. Unset means unknown.
    pub runtime: Option<String>,
    /// Current host version used for `HostVersion` gating.
    pub version: Option<String>,
    /// Host module path; enables host-relative discovery.
    pub module: Option<PathBuf>,
}

/// [discovery] section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverySection {
    /// Modules scanned for extension point declarations
    #[serde(default)]
    pub points: Vec<PathBuf>,
    /// Explicit extension directories
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    /// File patterns treated as library modules when a directory has no manifest
    #[serde(default = "default_library_patterns")]
    pub library_patterns: Vec<String>,
    /// Sibling-directory patterns for host-relative discovery
    #[serde(default = "default_host_patterns")]
    pub host_patterns: Vec<String>,
    /// Host-relative patterns used when the host came from a package manager
    #[serde(default = "default_package_host_patterns")]
    pub package_host_patterns: Vec<String>,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            directories: Vec::new(),
            library_patterns: default_library_patterns(),
            host_patterns: default_host_patterns(),
            package_host_patterns: default_package_host_patterns(),
        }
    }
}

pub(crate) fn default_library_patterns() -> Vec<String> {
    vec!["*.dll".to_string(), "*.so".to_string(), "*.dylib".to_string()]
}

pub(crate) fn default_host_patterns() -> Vec<String> {
    vec![
        "Addins.Extension.*/**/tools/".to_string(),
        "Addins.Extension.*/**/tools/*/".to_string(),
    ]
}

pub(crate) fn default_package_host_patterns() -> Vec<String> {
    vec![
        "addins-extension-*/**/tools/".to_string(),
        "addins-extension-*/**/tools/*/".to_string(),
    ]
}

/// [extensions] section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExtensionsSection {
    /// Implementing type names disabled once extensions are loaded
    #[serde(default)]
    pub disabled: Vec<String>,
}
