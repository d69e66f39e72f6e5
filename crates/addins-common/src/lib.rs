//! Shared building blocks for the addins workspace.
//!
//! - [`vfs`]: the file-system abstraction every scan goes through
//! - [`config`]: the `addins.toml` configuration model

pub mod config;
pub mod vfs;

pub use config::AddinsConfig;
pub use vfs::{MemoryVfs, OsVfs, Vfs};

pub type Result<T> = anyhow::Result<T>;
