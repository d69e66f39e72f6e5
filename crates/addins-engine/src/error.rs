//! Error types for the addins engine

use addins_metadata::MetadataError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while discovering and loading extensions
#[derive(Debug, Error)]
pub enum EngineError {
    /// Two extension points declared the same path
    #[error("The path {path} is already in use for another extension point")]
    DuplicatePath { path: String },

    /// A module-level extension point declaration is missing its path or contract
    #[error("Invalid extension point declaration in {}: {reason}", module.display())]
    InvalidDeclaration { module: PathBuf, reason: String },

    /// The host reported a runtime no host can run on
    #[error("Host runtime {runtime} is not valid for a host: it must target the framework or core runtime, not the standard surface")]
    InvalidHostRuntime { runtime: String },

    /// An extension names a path no extension point declared
    #[error("Unable to locate extension point for type {type_name}. The path {path} cannot be found")]
    UnresolvedPath { type_name: String, path: String },

    /// An extension without a path matches no extension point contract
    #[error("Unable to deduce extension point for type {type_name}. Specify Path on the extension attribute to resolve")]
    UndeducedExtensionPoint { type_name: String },

    /// An explicitly named module could not be read
    #[error("Specified extension {} could not be read", path.display())]
    UnreadableModule {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },

    /// A directory or manifest could not be read during discovery
    #[error("Unable to access {}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No constructor was registered for an extension type
    #[error("No activator registered for extension type {type_name}")]
    MissingActivator { type_name: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata errors outside of module reading
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl EngineError {
    pub(crate) fn access(path: &Path, source: std::io::Error) -> Self {
        EngineError::Access {
            path: path.to_path_buf(),
            source,
        }
    }
}
