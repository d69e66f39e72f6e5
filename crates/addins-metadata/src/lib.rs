//! Static metadata for addins discovery
//!
//! This crate describes what the engine can learn about a module without
//! loading it: its name, version and target runtime, its module-level
//! attributes, and its declared types with their attributes, interfaces and
//! base types. [`MetadataReader`] is the seam; [`JsonMetadataReader`] is the
//! bundled implementation.

pub mod error;
pub mod model;
pub mod reader;
pub mod runtime;
pub mod version;

pub use error::{MetadataError, Result};
pub use model::{Attribute, AttributeValue, ModuleHeader, ModuleMetadata, TypeDefinition};
pub use reader::{JsonMetadataReader, MetadataReader};
pub use runtime::{RuntimeIdentifier, RuntimeKind};
pub use version::Version;
