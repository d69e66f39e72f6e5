//! Installed extension records.

use addins_metadata::{RuntimeIdentifier, Version};
use std::path::{Path, PathBuf};

/// Metadata for one discovered extension implementation.
///
/// Identity is the pair (module path, implementing type name).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionNode {
    module_path: PathBuf,
    module_version: Version,
    type_name: String,
    path: Option<String>,
    description: Option<String>,
    enabled: bool,
    properties: Vec<(String, String)>,
    host_version: Option<Version>,
    target_runtime: Option<RuntimeIdentifier>,
}

impl ExtensionNode {
    pub fn new(
        module_path: impl Into<PathBuf>,
        module_version: Version,
        type_name: impl Into<String>,
        target_runtime: Option<RuntimeIdentifier>,
    ) -> Self {
        Self {
            module_path: module_path.into(),
            module_version,
            type_name: type_name.into(),
            path: None,
            description: None,
            enabled: true,
            properties: Vec::new(),
            host_version: None,
            target_runtime,
        }
    }

    /// Path of the module declaring the extension
    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    pub fn module_version(&self) -> Version {
        self.module_version
    }

    /// Full name of the implementing type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Extension point path; set once the point is resolved or deduced
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Minimum host version the extension declared, if any
    pub fn host_version(&self) -> Option<Version> {
        self.host_version
    }

    pub fn target_runtime(&self) -> Option<&RuntimeIdentifier> {
        self.target_runtime.as_ref()
    }

    /// All properties as (name, value) pairs; names may repeat
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Every value recorded under `name`
    pub fn property_values<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.properties
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value recorded under `name`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.property_values(name).next()
    }

    pub(crate) fn set_path(&mut self, path: Option<String>) {
        self.path = path;
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_host_version(&mut self, version: Option<Version>) {
        self.host_version = version;
    }

    pub(crate) fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.push((name.into(), value.into()));
    }
}
