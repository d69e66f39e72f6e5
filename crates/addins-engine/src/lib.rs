//! Addins Engine - Extension discovery and loading
//!
//! This crate provides:
//! - The extension point registry
//! - `.addins` manifest parsing and directory scanning
//! - Candidate module tracking
//! - One-time lazy extension loading with extension point deduction
//! - Host/module runtime compatibility checks

pub mod error;
pub mod extensions;
pub mod host;
pub mod runtime;

pub use error::{EngineError, Result};
pub use extensions::{
    Activator, CandidateModule, CandidateTracker, Contract, DiscoveryOptions, ExtensionManager,
    ExtensionNode, ExtensionPoint, ExtensionPointRegistry, TypeActivator,
};
pub use host::HostInfo;
