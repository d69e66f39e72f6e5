//! Addins CLI Library
//!
//! This library exposes CLI functionality for programmatic use and testing.

pub mod commands;
pub mod context;
pub mod output;

pub use context::GlobalOptions;
pub use output::OutputFormat;
