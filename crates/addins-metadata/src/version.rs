//! Four-part module versions.

use crate::error::MetadataError;
use std::fmt;
use std::str::FromStr;

/// A `major.minor[.build[.revision]]` version.
///
/// Ordering is component-wise and an absent component sorts below any present
/// one, so `4.7 < 4.7.0 < 4.7.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl Version {
    /// A three-part version.
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: None,
        }
    }

    /// A two-part version.
    pub const fn major_minor(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Drops the revision component.
    pub fn without_revision(self) -> Self {
        Self {
            revision: None,
            ..self
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MetadataError::InvalidVersion(s.to_string());
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let parts = digits
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Version::major_minor(*major, *minor)),
            [major, minor, build] => Ok(Version::new(*major, *minor, *build)),
            [major, minor, build, revision] => Ok(Version {
                major: *major,
                minor: *minor,
                build: Some(*build),
                revision: Some(*revision),
            }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Version {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_to_four_parts() {
        assert_eq!("4.8".parse::<Version>().unwrap(), Version::major_minor(4, 8));
        assert_eq!("v4.7.2".parse::<Version>().unwrap(), Version::new(4, 7, 2));
        let full: Version = "3.17.0.12".parse().unwrap();
        assert_eq!(full.revision, Some(12));
        assert_eq!(full.to_string(), "3.17.0.12");
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for bad in ["", "4", "4.x", "1.2.3.4.5", "4..1", "-1.0"] {
            assert!(bad.parse::<Version>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_missing_components_sort_first() {
        let two: Version = "4.7".parse().unwrap();
        let three: Version = "4.7.0".parse().unwrap();
        let four: Version = "4.7.0.0".parse().unwrap();
        assert!(two < three);
        assert!(three < four);
        assert!(Version::new(4, 7, 2) > Version::new(4, 7, 1));
        assert!(Version::major_minor(10, 0) > Version::new(9, 9, 9));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1.2.3\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Version::new(1, 2, 3));
        assert!(serde_json::from_str::<Version>("\"nope\"").is_err());
    }
}
