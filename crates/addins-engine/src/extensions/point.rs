//! Extension points: named, typed slots the host exposes.

use crate::extensions::node::ExtensionNode;

/// A declared extension point and the nodes installed under it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionPoint {
    path: String,
    type_name: String,
    description: Option<String>,
    extensions: Vec<ExtensionNode>,
}

impl ExtensionPoint {
    pub fn new(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            type_name: type_name.into(),
            description: None,
            extensions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Unique identifying path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full name of the contract extensions must satisfy
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Installed nodes, in installation order
    pub fn extensions(&self) -> &[ExtensionNode] {
        &self.extensions
    }

    pub(crate) fn extensions_mut(&mut self) -> &mut [ExtensionNode] {
        &mut self.extensions
    }

    /// Append a node; returns its position within this point.
    pub(crate) fn install(&mut self, node: ExtensionNode) -> usize {
        self.extensions.push(node);
        self.extensions.len() - 1
    }
}
