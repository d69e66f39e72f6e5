//! Metadata reader contract and the JSON descriptor implementation.
//!
//! A reader never executes module code. [`JsonMetadataReader`] looks for a
//! `<module file name>.metadata.json` descriptor beside the module:
//!
//! ```json
//! {
//!   "name": "Vendor.Reporting",
//!   "version": "1.2.0",
//!   "target_runtime": "core@8.0",
//!   "types": [
//!     {
//!       "full_name": "Vendor.Reporting.XmlReporter",
//!       "interfaces": ["Host.IResultWriter"],
//!       "attributes": [{ "type_name": "Addins.ExtensionAttribute" }]
//!     }
//!   ]
//! }
//! ```

use crate::error::{MetadataError, Result};
use crate::model::{Attribute, ModuleHeader, ModuleMetadata, TypeDefinition};
use crate::runtime::RuntimeIdentifier;
use crate::version::Version;
use addins_common::Vfs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads static metadata from module files.
pub trait MetadataReader {
    /// Read just enough to classify the module: name, version, target runtime.
    fn read_header(&self, path: &Path) -> Result<ModuleHeader>;

    /// Read the full metadata: module attributes and declared types.
    fn read_module(&self, path: &Path) -> Result<ModuleMetadata>;
}

/// Suffix appended to a module file name to locate its descriptor.
pub const DESCRIPTOR_SUFFIX: &str = ".metadata.json";

/// Path of the descriptor describing `module`.
pub fn descriptor_path(module: &Path) -> PathBuf {
    let mut name = module
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(DESCRIPTOR_SUFFIX);
    module.with_file_name(name)
}

#[derive(Debug, Deserialize)]
struct HeaderDescriptor {
    name: Option<String>,
    version: Option<Version>,
    target_runtime: Option<RuntimeIdentifier>,
    /// Bare runtime version, used when `target_runtime` is absent
    runtime_version: Option<Version>,
}

#[derive(Debug, Deserialize)]
struct ModuleDescriptor {
    #[serde(flatten)]
    header: HeaderDescriptor,
    #[serde(default)]
    attributes: Vec<Attribute>,
    #[serde(default)]
    types: Vec<TypeDefinition>,
}

impl HeaderDescriptor {
    fn into_header(self, module: &Path) -> ModuleHeader {
        let name = self.name.unwrap_or_else(|| {
            module
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let target_runtime = self.target_runtime.or_else(|| {
            self.runtime_version
                .map(|v| RuntimeIdentifier::framework(v.without_revision()))
        });

        ModuleHeader {
            name,
            version: self.version.unwrap_or(Version::major_minor(0, 0)),
            target_runtime,
        }
    }
}

/// Reads `.metadata.json` descriptors through a [`Vfs`].
#[derive(Debug, Clone)]
pub struct JsonMetadataReader<V: Vfs> {
    vfs: V,
}

impl<V: Vfs> JsonMetadataReader<V> {
    pub fn new(vfs: V) -> Self {
        Self { vfs }
    }

    fn read_descriptor<T: for<'de> Deserialize<'de>>(&self, module: &Path) -> Result<T> {
        if !self.vfs.is_file(module) {
            return Err(MetadataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Module not found: {}", module.display()),
            )));
        }

        let descriptor = descriptor_path(module);
        if !self.vfs.is_file(&descriptor) {
            return Err(MetadataError::bad_format(module, "no metadata descriptor"));
        }

        debug!("Reading metadata descriptor {}", descriptor.display());
        let content = self.vfs.read_to_string(&descriptor)?;
        serde_json::from_str(&content)
            .map_err(|e| MetadataError::bad_format(module, format!("invalid descriptor: {}", e)))
    }
}

impl<V: Vfs> MetadataReader for JsonMetadataReader<V> {
    fn read_header(&self, path: &Path) -> Result<ModuleHeader> {
        let header: HeaderDescriptor = self.read_descriptor(path)?;
        Ok(header.into_header(path))
    }

    fn read_module(&self, path: &Path) -> Result<ModuleMetadata> {
        let descriptor: ModuleDescriptor = self.read_descriptor(path)?;
        Ok(ModuleMetadata {
            header: descriptor.header.into_header(path),
            attributes: descriptor.attributes,
            types: descriptor.types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeKind;
    use addins_common::MemoryVfs;

    const DESCRIPTOR: &str = r#"{
        "name": "Vendor.Reporting",
        "version": "1.2.0",
        "target_runtime": "core@8.0",
        "attributes": [
            { "type_name": "Addins.ExtensionPointAttribute",
              "named": { "Path": "/Host/Writers", "Type": "Host.IResultWriter" } }
        ],
        "types": [
            {
                "full_name": "Vendor.Reporting.XmlReporter",
                "interfaces": ["Host.IResultWriter"],
                "base_type": "Vendor.Reporting.ReporterBase",
                "attributes": [{ "type_name": "Addins.ExtensionAttribute" }]
            }
        ]
    }"#;

    fn reader() -> JsonMetadataReader<MemoryVfs> {
        let vfs = MemoryVfs::new()
            .with_file("/ext/reporting.dll", "")
            .with_file("/ext/reporting.dll.metadata.json", DESCRIPTOR)
            .with_file("/ext/native.dll", "")
            .with_file("/ext/broken.dll", "")
            .with_file("/ext/broken.dll.metadata.json", "{ not json");
        JsonMetadataReader::new(vfs)
    }

    #[test]
    fn test_descriptor_path() {
        assert_eq!(
            descriptor_path(Path::new("/a/b/x.dll")),
            PathBuf::from("/a/b/x.dll.metadata.json")
        );
    }

    #[test]
    fn test_read_header() {
        let header = reader().read_header(Path::new("/ext/reporting.dll")).unwrap();
        assert_eq!(header.name, "Vendor.Reporting");
        assert_eq!(header.version, Version::new(1, 2, 0));
        assert_eq!(
            header.target_runtime.map(|r| r.kind),
            Some(RuntimeKind::Core)
        );
    }

    #[test]
    fn test_read_module() {
        let module = reader().read_module(Path::new("/ext/reporting.dll")).unwrap();
        assert_eq!(module.types.len(), 1);
        let ty = module.find_type("Vendor.Reporting.XmlReporter").unwrap();
        assert_eq!(ty.interfaces, vec!["Host.IResultWriter".to_string()]);
        assert_eq!(ty.base_type.as_deref(), Some("Vendor.Reporting.ReporterBase"));
        assert_eq!(
            module
                .attributes_named("Addins.ExtensionPointAttribute")
                .count(),
            1
        );
    }

    #[test]
    fn test_missing_descriptor_is_bad_format() {
        let err = reader().read_header(Path::new("/ext/native.dll")).unwrap_err();
        assert!(matches!(err, MetadataError::BadFormat { .. }));
    }

    #[test]
    fn test_invalid_descriptor_is_bad_format() {
        let err = reader().read_module(Path::new("/ext/broken.dll")).unwrap_err();
        assert!(matches!(err, MetadataError::BadFormat { .. }));
    }

    #[test]
    fn test_missing_module_is_io_error() {
        let err = reader().read_header(Path::new("/ext/absent.dll")).unwrap_err();
        assert!(matches!(err, MetadataError::Io(_)));
    }

    #[test]
    fn test_runtime_version_fallback_and_defaults() {
        let vfs = MemoryVfs::new()
            .with_file("/old/legacy.dll", "")
            .with_file(
                "/old/legacy.dll.metadata.json",
                r#"{ "runtime_version": "4.0.30319.42000" }"#,
            );
        let header = JsonMetadataReader::new(vfs)
            .read_header(Path::new("/old/legacy.dll"))
            .unwrap();
        assert_eq!(header.name, "legacy");
        assert_eq!(header.version, Version::major_minor(0, 0));
        assert_eq!(
            header.target_runtime,
            Some(RuntimeIdentifier::framework(Version::new(4, 0, 30319)))
        );
    }
}
