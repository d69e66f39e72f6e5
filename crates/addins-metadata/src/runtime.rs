//! Target-runtime identifiers.
//!
//! A module declares the runtime generation it was built for as
//! `kind@version`, for example `core@8.0` or `framework@4.7.2`.

use crate::error::MetadataError;
use crate::version::Version;
use std::fmt;
use std::str::FromStr;

/// Runtime generation a module targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeKind {
    /// Long-established, full-featured generation with its own versioning
    Framework,
    /// Modern cross-platform generation
    Core,
    /// Thin compatibility surface shared by the other two
    Standard,
    /// Anything this engine does not recognize, kept verbatim
    Other(String),
}

impl RuntimeKind {
    pub fn as_str(&self) -> &str {
        match self {
            RuntimeKind::Framework => "framework",
            RuntimeKind::Core => "core",
            RuntimeKind::Standard => "standard",
            RuntimeKind::Other(name) => name,
        }
    }
}

impl From<&str> for RuntimeKind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "framework" => RuntimeKind::Framework,
            "core" => RuntimeKind::Core,
            "standard" => RuntimeKind::Standard,
            _ => RuntimeKind::Other(value.trim().to_string()),
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime kind plus the version of that runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeIdentifier {
    pub kind: RuntimeKind,
    pub version: Version,
}

impl RuntimeIdentifier {
    pub fn new(kind: RuntimeKind, version: Version) -> Self {
        Self { kind, version }
    }

    pub fn framework(version: Version) -> Self {
        Self::new(RuntimeKind::Framework, version)
    }

    pub fn core(version: Version) -> Self {
        Self::new(RuntimeKind::Core, version)
    }

    pub fn standard(version: Version) -> Self {
        Self::new(RuntimeKind::Standard, version)
    }
}

impl fmt::Display for RuntimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.version)
    }
}

impl FromStr for RuntimeIdentifier {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, version) = s
            .split_once('@')
            .ok_or_else(|| MetadataError::InvalidRuntime(s.to_string()))?;
        if kind.trim().is_empty() {
            return Err(MetadataError::InvalidRuntime(s.to_string()));
        }
        let version = version
            .parse::<Version>()
            .map_err(|_| MetadataError::InvalidRuntime(s.to_string()))?;
        Ok(RuntimeIdentifier::new(RuntimeKind::from(kind), version))
    }
}

impl TryFrom<String> for RuntimeIdentifier {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuntimeIdentifier> for String {
    fn from(value: RuntimeIdentifier) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        let core: RuntimeIdentifier = "core@8.0".parse().unwrap();
        assert_eq!(core, RuntimeIdentifier::core(Version::major_minor(8, 0)));

        let framework: RuntimeIdentifier = "Framework@4.7.2".parse().unwrap();
        assert_eq!(framework.kind, RuntimeKind::Framework);
        assert_eq!(framework.version, Version::new(4, 7, 2));
        assert_eq!(framework.to_string(), "framework@4.7.2");
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let other: RuntimeIdentifier = "mono@6.12".parse().unwrap();
        assert_eq!(other.kind, RuntimeKind::Other("mono".to_string()));
        assert_eq!(other.to_string(), "mono@6.12");
    }

    #[test]
    fn test_rejects_malformed_identifiers() {
        for bad in ["core", "@8.0", "core@", "core@eight"] {
            assert!(bad.parse::<RuntimeIdentifier>().is_err(), "{bad} should not parse");
        }
    }
}
