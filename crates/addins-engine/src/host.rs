//! Identity of the running host.

use crate::error::{EngineError, Result};
use addins_common::config::HostSection;
use addins_metadata::{RuntimeIdentifier, Version};

/// Version of this engine, used as the host version when none is configured.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the engine knows about the host it runs inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Runtime the host runs on; `None` when it cannot be determined
    pub runtime: Option<RuntimeIdentifier>,
    /// Current host version, compared against `HostVersion` declarations
    pub version: Version,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            runtime: None,
            version: engine_version(),
        }
    }
}

impl HostInfo {
    pub fn new(version: Version) -> Self {
        Self {
            runtime: None,
            version,
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeIdentifier) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build host information from the `[host]` config section
    pub fn from_config(section: &HostSection) -> Result<Self> {
        let mut host = HostInfo::default();
        if let Some(version) = &section.version {
            host.version = version
                .parse()
                .map_err(|e| EngineError::Config(format!("host.version: {}", e)))?;
        }
        if let Some(runtime) = &section.runtime {
            host.runtime = Some(
                runtime
                    .parse()
                    .map_err(|e| EngineError::Config(format!("host.runtime: {}", e)))?,
            );
        }
        Ok(host)
    }
}

fn engine_version() -> Version {
    ENGINE_VERSION
        .parse()
        .unwrap_or(Version::major_minor(0, 0))
}
