//! Extension points and extensions
//!
//! Hosts declare extension points; independently built modules contribute
//! extensions to them. The [`ExtensionManager`] finds candidate modules,
//! reads their metadata without running them, and installs every extension
//! the host can load under its extension point.

pub mod activation;
mod discovery;
pub mod finder;
mod loader;
pub mod manager;
pub mod manifest;
pub mod node;
pub mod point;
pub mod registry;
pub mod tracker;

pub use activation::{Activator, Contract, TypeActivator};
pub use finder::DirectoryFinder;
pub use manager::{DiscoveryOptions, ExtensionManager};
pub use manifest::{ManifestEntry, ManifestFile, MANIFEST_PATTERN};
pub use node::ExtensionNode;
pub use point::ExtensionPoint;
pub use registry::ExtensionPointRegistry;
pub use tracker::{CandidateModule, CandidateTracker};

/// Marks a type as an extension
pub const EXTENSION_ATTRIBUTE: &str = "Addins.ExtensionAttribute";

/// Adds a name/value property to an extension
pub const EXTENSION_PROPERTY_ATTRIBUTE: &str = "Addins.ExtensionPropertyAttribute";

/// Module-level extension point declaration
pub const EXTENSION_POINT_ATTRIBUTE: &str = "Addins.ExtensionPointAttribute";

/// Type-level extension point declaration
pub const TYPE_EXTENSION_POINT_ATTRIBUTE: &str = "Addins.TypeExtensionPointAttribute";

/// Path prefix of type-level extension points declared without a path
pub const TYPE_EXTENSIONS_PATH_PREFIX: &str = "/Addins/TypeExtensions/";

/// Base type that ends extension point deduction
pub const ROOT_OBJECT_TYPE: &str = "Object";

/// File beside a host module installed by a package manager
pub const PACKAGE_MARKER: &str = "VERIFICATION.txt";
