//! Runtime compatibility gate.
//!
//! Decides from the host's and a candidate's runtime identifiers whether the
//! host can load the candidate at all. The gate only blocks on positive
//! evidence: an unknown host or candidate runtime is compatible.

use crate::error::{EngineError, Result};
use addins_metadata::{RuntimeIdentifier, RuntimeKind, Version};
use std::path::Path;
use tracing::info;

/// Lowest standard-surface version a framework host accepts.
pub const STANDARD_ON_FRAMEWORK_MINIMUM: Version = Version::new(4, 7, 2);

/// Check whether a host on `host` can load a module targeting `candidate`.
///
/// A host that reports the standard surface as its own runtime is a
/// configuration error.
pub fn can_load(
    host: Option<&RuntimeIdentifier>,
    candidate: Option<&RuntimeIdentifier>,
    candidate_path: &Path,
) -> Result<bool> {
    let Some(host) = host else {
        return Ok(true);
    };

    if host.kind == RuntimeKind::Standard {
        return Err(EngineError::InvalidHostRuntime {
            runtime: host.to_string(),
        });
    }

    let Some(candidate) = candidate else {
        return Ok(true);
    };

    let compatible = match host.kind {
        RuntimeKind::Core => match candidate.kind {
            RuntimeKind::Core | RuntimeKind::Standard => true,
            _ => {
                info!(
                    "Core hosts require core or standard extensions, {} targets {}",
                    candidate_path.display(),
                    candidate
                );
                false
            }
        },
        // Framework and unrecognized host kinds share the framework rules
        _ => match candidate.kind {
            RuntimeKind::Framework => host.version.major == 4 || candidate.version.major < 4,
            RuntimeKind::Standard => candidate.version >= STANDARD_ON_FRAMEWORK_MINIMUM,
            _ => {
                info!(
                    "Framework hosts cannot load {} targeting {}",
                    candidate_path.display(),
                    candidate
                );
                false
            }
        },
    };

    Ok(compatible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(s: &str) -> RuntimeIdentifier {
        s.parse().unwrap()
    }

    fn check(host: &str, candidate: &str) -> bool {
        can_load(Some(&rt(host)), Some(&rt(candidate)), Path::new("/ext/x.dll")).unwrap()
    }

    #[test]
    fn test_core_host() {
        assert!(check("core@8.0", "core@6.0"));
        assert!(check("core@8.0", "standard@2.0"));
        assert!(!check("core@8.0", "framework@4.8"));
        assert!(!check("core@8.0", "mono@6.12"));
    }

    #[test]
    fn test_framework_host_with_framework_candidate() {
        assert!(check("framework@4.8", "framework@4.5"));
        assert!(check("framework@4.8", "framework@2.0"));
        assert!(check("framework@2.0", "framework@3.5"));
        assert!(!check("framework@2.0", "framework@4.0"));
    }

    #[test]
    fn test_framework_host_with_standard_candidate() {
        assert!(check("framework@4.8", "standard@4.7.2"));
        assert!(check("framework@4.8", "standard@5.0"));
        assert!(!check("framework@4.8", "standard@2.0"));
        assert!(!check("framework@4.8", "standard@4.7"));
    }

    #[test]
    fn test_framework_host_rejects_core() {
        assert!(!check("framework@4.8", "core@8.0"));
    }

    #[test]
    fn test_unknown_host_kind_follows_framework_rules() {
        assert!(check("mono@4.8", "framework@4.5"));
        assert!(check("mono@6.12", "framework@3.5"));
        assert!(!check("mono@6.12", "framework@4.5"));
        assert!(!check("mono@6.12", "core@8.0"));
    }

    #[test]
    fn test_standard_host_is_configuration_error() {
        let err = can_load(
            Some(&rt("standard@2.0")),
            Some(&rt("core@8.0")),
            Path::new("/ext/x.dll"),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidHostRuntime { .. }));
    }

    #[test]
    fn test_unknown_runtimes_are_permissive() {
        let path = Path::new("/ext/x.dll");
        assert!(can_load(None, Some(&rt("framework@4.8")), path).unwrap());
        assert!(can_load(None, None, path).unwrap());
        assert!(can_load(Some(&rt("core@8.0")), None, path).unwrap());
    }
}
