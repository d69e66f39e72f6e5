//! Binding Rust traits to declared contracts and building extension objects.
//!
//! The engine never runs module code. A host that wants live objects for its
//! extensions names the contract of each trait it accepts and registers a
//! constructor per implementing type.
//!
//! ```ignore
//! trait ResultWriter { fn write(&self, out: &str); }
//!
//! impl Contract for dyn ResultWriter {
//!     const TYPE_NAME: &'static str = "Host.IResultWriter";
//! }
//!
//! let mut activator = TypeActivator::<dyn ResultWriter>::new();
//! activator.register("Vendor.XmlWriter", |_node| Box::new(XmlWriter));
//! let writers = manager.extensions_for(&activator)?;
//! ```

use crate::error::{EngineError, Result};
use crate::extensions::node::ExtensionNode;
use std::collections::HashMap;
use std::fmt;

/// A Rust type standing in for a declared contract type.
pub trait Contract {
    /// Full name of the contract as extension points declare it
    const TYPE_NAME: &'static str;
}

/// Turns an installed node into an object implementing `C`.
pub trait Activator<C: ?Sized> {
    fn activate(&self, node: &ExtensionNode) -> Result<Box<C>>;
}

type Constructor<C> = Box<dyn Fn(&ExtensionNode) -> Box<C>>;

/// Activator backed by a table of constructors keyed by type full name.
pub struct TypeActivator<C: ?Sized> {
    constructors: HashMap<String, Constructor<C>>,
}

impl<C: ?Sized> Default for TypeActivator<C> {
    fn default() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for TypeActivator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeActivator")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C: ?Sized> TypeActivator<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for an implementing type.
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&ExtensionNode) -> Box<C> + 'static,
    {
        self.constructors
            .insert(type_name.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }
}

impl<C: ?Sized> Activator<C> for TypeActivator<C> {
    fn activate(&self, node: &ExtensionNode) -> Result<Box<C>> {
        let constructor = self.constructors.get(node.type_name()).ok_or_else(|| {
            EngineError::MissingActivator {
                type_name: node.type_name().to_string(),
            }
        })?;
        Ok(constructor(node))
    }
}
