//! Extension point registry
//!
//! Indexes declared extension points by their unique path and by contract
//! type, owns the nodes installed under them, and deduces which point an
//! undeclared extension belongs to.

use crate::error::{EngineError, Result};
use crate::extensions::node::ExtensionNode;
use crate::extensions::point::ExtensionPoint;
use crate::extensions::{
    EXTENSION_POINT_ATTRIBUTE, ROOT_OBJECT_TYPE, TYPE_EXTENSION_POINT_ATTRIBUTE,
    TYPE_EXTENSIONS_PATH_PREFIX,
};
use addins_metadata::{ModuleMetadata, TypeDefinition};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Registry of extension points, in declaration order.
#[derive(Debug, Default)]
pub struct ExtensionPointRegistry {
    /// All points, in declaration order
    points: Vec<ExtensionPoint>,
    /// Path -> position in `points`
    index: HashMap<String, usize>,
    /// Every installed node as (point position, node position), in install order
    installed: Vec<(usize, usize)>,
    /// Types declared by the modules scanned for points
    known_types: HashMap<String, TypeDefinition>,
}

impl ExtensionPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new extension point.
    ///
    /// Fails with [`EngineError::DuplicatePath`] when the path is taken; the
    /// existing point is left untouched.
    pub fn declare(
        &mut self,
        path: impl Into<String>,
        type_name: impl Into<String>,
        description: Option<String>,
    ) -> Result<&ExtensionPoint> {
        let path = path.into();
        if self.index.contains_key(&path) {
            return Err(EngineError::DuplicatePath { path });
        }

        let point = ExtensionPoint::new(path.clone(), type_name).with_description(description);
        info!(
            "  Found extension point: Path={}, Type={}",
            point.path(),
            point.type_name()
        );

        self.points.push(point);
        let position = self.points.len() - 1;
        self.index.insert(path, position);
        Ok(&self.points[position])
    }

    /// Scan one module's metadata for point declarations.
    ///
    /// Module-level declarations must carry both a path and a contract;
    /// type-level declarations default their path to
    /// `/Addins/TypeExtensions/<TypeName>` and use the declaring type as the
    /// contract. Returns how many points were declared.
    pub fn register_module(&mut self, module_path: &Path, metadata: &ModuleMetadata) -> Result<usize> {
        info!(
            "Scanning {} for extension points",
            metadata.header.name
        );
        let mut declared = 0;

        for attr in metadata.attributes_named(EXTENSION_POINT_ATTRIBUTE) {
            let path = attr.arg_str(0).or_else(|| attr.named_str("Path"));
            let type_name = attr.arg_str(1).or_else(|| attr.named_str("Type"));
            let (Some(path), Some(type_name)) = (path, type_name) else {
                return Err(EngineError::InvalidDeclaration {
                    module: module_path.to_path_buf(),
                    reason: "an extension point needs both a path and a contract type".to_string(),
                });
            };

            let description = attr.named_str("Description").map(str::to_string);
            self.declare(path, type_name, description)?;
            declared += 1;
        }

        for ty in &metadata.types {
            for attr in ty.attributes_named(TYPE_EXTENSION_POINT_ATTRIBUTE) {
                let path = attr
                    .arg_str(0)
                    .or_else(|| attr.named_str("Path"))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}{}", TYPE_EXTENSIONS_PATH_PREFIX, ty.name()));

                let description = attr.named_str("Description").map(str::to_string);
                self.declare(path, ty.full_name.clone(), description)?;
                declared += 1;
            }
        }

        for ty in &metadata.types {
            self.known_types
                .entry(ty.full_name.clone())
                .or_insert_with(|| ty.clone());
        }

        Ok(declared)
    }

    /// Get an extension point by its unique path
    pub fn lookup_by_path(&self, path: &str) -> Option<&ExtensionPoint> {
        self.position_by_path(path).map(|i| &self.points[i])
    }

    /// Get the first extension point whose contract is `type_name`
    pub fn lookup_by_contract(&self, type_name: &str) -> Option<&ExtensionPoint> {
        self.position_by_contract(type_name).map(|i| &self.points[i])
    }

    pub(crate) fn position_by_path(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub(crate) fn position_by_contract(&self, type_name: &str) -> Option<usize> {
        self.points.iter().position(|p| p.type_name() == type_name)
    }

    pub(crate) fn point(&self, position: usize) -> &ExtensionPoint {
        &self.points[position]
    }

    /// All extension points, in declaration order
    pub fn points(&self) -> &[ExtensionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A type declared by one of the modules scanned for points
    pub fn known_type(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.known_types.get(full_name)
    }

    /// Deduce the extension point an extension type satisfies.
    ///
    /// Checks the type itself, then each directly implemented interface
    /// depth-first in declaration order, then the base type chain up to the
    /// root object type. Types are resolved in `module` first and then among
    /// the types of the point-declaring modules; unresolvable types end
    /// their branch. Returns `None` when nothing matches.
    pub fn deduce(&self, ty: &TypeDefinition, module: &ModuleMetadata) -> Option<&ExtensionPoint> {
        self.deduce_position(ty, module).map(|i| &self.points[i])
    }

    pub(crate) fn deduce_position(&self, ty: &TypeDefinition, module: &ModuleMetadata) -> Option<usize> {
        let mut seen = HashSet::new();
        self.deduce_from(&ty.full_name, Some(ty), module, &mut seen)
    }

    fn deduce_from<'a>(
        &'a self,
        type_name: &str,
        definition: Option<&'a TypeDefinition>,
        module: &'a ModuleMetadata,
        seen: &mut HashSet<String>,
    ) -> Option<usize> {
        if !seen.insert(type_name.to_string()) {
            return None;
        }

        if let Some(position) = self.position_by_contract(type_name) {
            return Some(position);
        }

        let definition = definition
            .or_else(|| module.find_type(type_name))
            .or_else(|| self.known_type(type_name))?;

        for interface in &definition.interfaces {
            if let Some(position) = self.deduce_from(interface, None, module, seen) {
                return Some(position);
            }
        }

        match definition.base_type.as_deref() {
            Some(base) if base != ROOT_OBJECT_TYPE => self.deduce_from(base, None, module, seen),
            _ => None,
        }
    }

    /// Append a node to a point and to the global install order.
    pub(crate) fn install(&mut self, position: usize, node: ExtensionNode) {
        let slot = self.points[position].install(node);
        self.installed.push((position, slot));
    }

    /// Every installed node, in install order
    pub fn installed(&self) -> impl Iterator<Item = &ExtensionNode> {
        self.installed
            .iter()
            .map(|&(point, slot)| &self.points[point].extensions()[slot])
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Enable or disable every node implemented by `type_name`.
    /// Returns how many nodes matched.
    pub(crate) fn set_enabled(&mut self, type_name: &str, enabled: bool) -> usize {
        let mut matched = 0;
        for point in &mut self.points {
            for node in point.extensions_mut() {
                if node.type_name() == type_name {
                    node.set_enabled(enabled);
                    matched += 1;
                }
            }
        }
        matched
    }
}
