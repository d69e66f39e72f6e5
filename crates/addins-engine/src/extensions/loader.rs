//! Extension loading
//!
//! Reads the full metadata of each tracked candidate, builds a node for
//! every type marked as an extension, and installs it under the extension
//! point it names or the one its type hierarchy implies.

use crate::error::{EngineError, Result};
use crate::extensions::discovery::skip_unreadable;
use crate::extensions::manager::ExtensionManager;
use crate::extensions::node::ExtensionNode;
use crate::extensions::registry::ExtensionPointRegistry;
use crate::extensions::tracker::CandidateModule;
use crate::extensions::{EXTENSION_ATTRIBUTE, EXTENSION_PROPERTY_ATTRIBUTE};
use crate::host::HostInfo;
use crate::runtime::can_load;
use addins_common::Vfs;
use addins_metadata::{Attribute, MetadataReader, ModuleMetadata, TypeDefinition, Version};
use tracing::{info, warn};

impl<V: Vfs, R: MetadataReader> ExtensionManager<V, R> {
    /// Load extensions from every tracked candidate, in tracking order.
    pub(crate) fn find_extensions_in_candidates(&mut self) -> Result<()> {
        let Self {
            reader,
            host,
            registry,
            tracker,
            ..
        } = self;

        for candidate in tracker.iter_mut() {
            find_extensions_in_module(candidate, &*reader, host, registry)?;
        }
        Ok(())
    }
}

fn find_extensions_in_module<R: MetadataReader + ?Sized>(
    candidate: &mut CandidateModule,
    reader: &R,
    host: &HostInfo,
    registry: &mut ExtensionPointRegistry,
) -> Result<()> {
    info!("Scanning {} for extensions", candidate.path().display());

    let module_path = candidate.path().to_path_buf();
    let module_version = candidate.version();
    let target_runtime = candidate.header().target_runtime.clone();
    let from_wildcard = candidate.from_wildcard();

    if !can_load(host.runtime.as_ref(), target_runtime.as_ref(), &module_path)? {
        info!("{} cannot be loaded on this runtime", module_path.display());
        return Ok(());
    }

    let metadata = match candidate.metadata(reader) {
        Ok(metadata) => metadata,
        Err(source) => return skip_unreadable(&module_path, from_wildcard, source),
    };

    for ty in &metadata.types {
        let Some(extension_attr) = ty.attribute(EXTENSION_ATTRIBUTE) else {
            continue;
        };

        if let Some(required) = required_host_version(extension_attr)? {
            if required > host.version {
                warn!(
                    "  Ignoring {}. It requires host version {}",
                    ty.name(),
                    required
                );
                continue;
            }
        }

        let mut node = ExtensionNode::new(
            &module_path,
            module_version,
            &ty.full_name,
            target_runtime.clone(),
        );
        node.set_path(extension_attr.named_str("Path").map(str::to_string));
        node.set_description(extension_attr.named_str("Description").map(str::to_string));
        node.set_enabled(extension_attr.named_bool("Enabled").unwrap_or(true));
        node.set_host_version(required_host_version(extension_attr)?);

        info!("  Found extension attribute on type {}", ty.name());

        for attr in ty.attributes_named(EXTENSION_PROPERTY_ATTRIBUTE) {
            let name = attr.arg_str(0).or_else(|| attr.named_str("Name"));
            let value = attr.arg_str(1).or_else(|| attr.named_str("Value"));
            if let (Some(name), Some(value)) = (name, value) {
                info!("    Extension property {} = {}", name, value);
                node.add_property(name, value);
            }
        }

        let position = resolve_point(registry, &mut node, ty, metadata)?;
        registry.install(position, node);
    }
    Ok(())
}

fn required_host_version(attr: &Attribute) -> Result<Option<Version>> {
    attr.named_str("HostVersion")
        .map(|v| v.parse::<Version>().map_err(EngineError::from))
        .transpose()
}

/// Position of the point a node belongs to; fills in the node's path when
/// the point was deduced.
fn resolve_point(
    registry: &ExtensionPointRegistry,
    node: &mut ExtensionNode,
    ty: &TypeDefinition,
    module: &ModuleMetadata,
) -> Result<usize> {
    if let Some(path) = node.path() {
        return registry
            .position_by_path(path)
            .ok_or_else(|| EngineError::UnresolvedPath {
                type_name: ty.full_name.clone(),
                path: path.to_string(),
            });
    }

    let position = registry
        .deduce_position(ty, module)
        .ok_or_else(|| EngineError::UndeducedExtensionPoint {
            type_name: ty.full_name.clone(),
        })?;
    node.set_path(Some(registry.point(position).path().to_string()));
    Ok(position)
}
