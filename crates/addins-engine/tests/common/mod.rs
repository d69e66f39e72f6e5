//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use addins_common::MemoryVfs;
use addins_engine::{ExtensionManager, HostInfo};
use addins_metadata::{JsonMetadataReader, MetadataReader, ModuleHeader, ModuleMetadata, Version};
use serde_json::{Value, json};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

pub type TestManager = ExtensionManager<MemoryVfs, JsonMetadataReader<MemoryVfs>>;

pub const HOST_MODULE: &str = "/app/Host.dll";

/// In-memory file tree of modules and their metadata descriptors.
#[derive(Clone, Default)]
pub struct Fixture {
    pub vfs: MemoryVfs,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host module declaring `/Host/Drivers` (contract `Host.IDriver`) and
    /// the type-level point `/Addins/TypeExtensions/IResultWriter`.
    pub fn with_host(self) -> Self {
        self.module(
            HOST_MODULE,
            json!({
                "name": "Host",
                "version": "3.0",
                "attributes": [
                    {
                        "type_name": "Addins.ExtensionPointAttribute",
                        "args": ["/Host/Drivers", "Host.IDriver"],
                        "named": { "Description": "Device drivers" }
                    }
                ],
                "types": [
                    { "full_name": "Host.IDriver" },
                    {
                        "full_name": "Host.IResultWriter",
                        "attributes": [{ "type_name": "Addins.TypeExtensionPointAttribute" }]
                    }
                ]
            }),
        )
    }

    /// A module file plus its `.metadata.json` descriptor
    pub fn module(self, path: &str, descriptor: Value) -> Self {
        let descriptor_path = format!("{}.metadata.json", path);
        Self {
            vfs: self
                .vfs
                .with_file(path, "")
                .with_file(descriptor_path, &descriptor.to_string()),
        }
    }

    /// A module file without any descriptor
    pub fn unreadable(self, path: &str) -> Self {
        self.file(path, "")
    }

    pub fn file(self, path: &str, content: &str) -> Self {
        Self {
            vfs: self.vfs.with_file(path, content),
        }
    }

    pub fn manager(&self, host: HostInfo) -> TestManager {
        ExtensionManager::with_vfs(self.vfs.clone(), host)
    }

    /// Manager whose reader counts header and full metadata reads
    pub fn counting_manager(
        &self,
        host: HostInfo,
    ) -> (ExtensionManager<MemoryVfs, CountingReader>, Rc<Reads>) {
        let reads = Rc::new(Reads::default());
        let reader = CountingReader {
            inner: JsonMetadataReader::new(self.vfs.clone()),
            reads: Rc::clone(&reads),
        };
        (
            ExtensionManager::with_reader(self.vfs.clone(), reader, host),
            reads,
        )
    }
}

/// Descriptor of an extension module
pub fn extension_module(name: &str, version: &str, types: Value) -> Value {
    json!({ "name": name, "version": version, "types": types })
}

/// Descriptor of an extension module built for `runtime`
pub fn runtime_module(name: &str, runtime: &str) -> Value {
    json!({ "name": name, "version": "1.0", "target_runtime": runtime })
}

/// `Addins.ExtensionAttribute` with the given named arguments
pub fn extension_attr(named: Value) -> Value {
    json!({ "type_name": "Addins.ExtensionAttribute", "named": named })
}

pub fn property_attr(name: &str, value: &str) -> Value {
    json!({ "type_name": "Addins.ExtensionPropertyAttribute", "args": [name, value] })
}

pub fn host(major: u32, minor: u32) -> HostInfo {
    HostInfo::new(Version::major_minor(major, minor))
}

pub fn host_on(runtime: &str) -> HostInfo {
    host(3, 0).with_runtime(runtime.parse().unwrap())
}

#[derive(Default)]
pub struct Reads {
    pub headers: Cell<usize>,
    pub modules: Cell<usize>,
}

pub struct CountingReader {
    inner: JsonMetadataReader<MemoryVfs>,
    reads: Rc<Reads>,
}

impl MetadataReader for CountingReader {
    fn read_header(&self, path: &Path) -> addins_metadata::Result<ModuleHeader> {
        self.reads.headers.set(self.reads.headers.get() + 1);
        self.inner.read_header(path)
    }

    fn read_module(&self, path: &Path) -> addins_metadata::Result<ModuleMetadata> {
        self.reads.modules.set(self.reads.modules.get() + 1);
        self.inner.read_module(path)
    }
}
