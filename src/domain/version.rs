use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation (major.minor.patch, no pre-release or build metadata)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string of exactly three dot-separated non-negative integers.
    ///
    /// Tag prefixes are not stripped here; use [`crate::domain::TagPattern::parse_version`]
    /// for tag names.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::version(format!(
                "'{}' - expected MAJOR.MINOR.PATCH",
                input
            )));
        }

        let major = parse_component(input, "major", parts[0])?;
        let minor = parse_component(input, "minor", parts[1])?;
        let patch = parse_component(input, "patch", parts[2])?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Total order: major, then minor, then patch
    pub fn compare(&self, other: &Version) -> Ordering {
        self.cmp(other)
    }

    /// Next version for `bump_type`, or `None` if the bumped component would overflow
    pub fn bump(&self, bump_type: VersionBump) -> Option<Self> {
        let next = match bump_type {
            VersionBump::Major => Version::new(self.major.checked_add(1)?, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor.checked_add(1)?, 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch.checked_add(1)?),
        };
        Some(next)
    }
}

fn parse_component(input: &str, name: &str, part: &str) -> Result<u32> {
    // u32::from_str accepts a leading '+', which is not a valid component
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseError::version(format!(
            "'{}' - {} component '{}' is not a non-negative integer",
            input, name, part
        )));
    }

    part.parse::<u32>().map_err(|_| {
        ReleaseError::version(format!(
            "'{}' - {} component '{}' is out of range",
            input, name, part
        ))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    /// All bump kinds in ascending order of impact
    pub const ALL: [VersionBump; 3] = [VersionBump::Patch, VersionBump::Minor, VersionBump::Major];

    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }

    /// Short operator-facing description of what the bump signals
    pub fn description(&self) -> &'static str {
        match self {
            VersionBump::Patch => "Bug fixes",
            VersionBump::Minor => "New features",
            VersionBump::Major => "Breaking changes",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VersionBump {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(VersionBump::Patch),
            "minor" => Ok(VersionBump::Minor),
            "major" => Ok(VersionBump::Major),
            other => Err(ReleaseError::version(format!(
                "unknown bump kind '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_rejects_prefix() {
        assert!(Version::parse("v1.2.3").is_err());
    }

    #[test]
    fn test_version_parse_invalid() {
        for input in [
            "1.2", "1.2.3.4", "", "1..3", "a.b.c", "1.2.-3", "1.2.+3", " 1.2.3", "1.2.3-beta",
            "1.2.3+build", "99999999999.0.0",
        ] {
            let err = Version::parse(input).unwrap_err();
            assert!(
                matches!(err, ReleaseError::InvalidVersionFormat(_)),
                "expected InvalidVersionFormat for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Major), Some(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Minor), Some(Version::new(1, 3, 0)));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Patch), Some(Version::new(1, 2, 4)));
    }

    #[test]
    fn test_bump_is_strictly_greater() {
        let samples = [
            Version::new(0, 0, 0),
            Version::new(0, 9, 9),
            Version::new(1, 0, 0),
            Version::new(2, 3, 1),
            Version::new(10, 0, 42),
        ];
        for v in samples {
            for kind in VersionBump::ALL {
                let bumped = v.bump(kind).unwrap();
                assert!(bumped > v, "{} bumped by {} should be > {}", bumped, kind, v);
                assert_eq!(bumped.compare(&v), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_bump_at_component_limit() {
        let v = Version::parse("1.2.4294967295").unwrap();
        assert_eq!(v.bump(VersionBump::Patch), None);
        assert_eq!(v.bump(VersionBump::Minor), Some(Version::new(1, 3, 0)));
        assert_eq!(v.bump(VersionBump::Major), Some(Version::new(2, 0, 0)));

        let top = Version::new(u32::MAX, u32::MAX, u32::MAX);
        for kind in VersionBump::ALL {
            assert_eq!(top.bump(kind), None);
        }
    }

    #[test]
    fn test_compare_orders_components() {
        assert_eq!(
            Version::new(1, 10, 0).compare(&Version::new(1, 9, 99)),
            Ordering::Greater
        );
        assert_eq!(
            Version::new(0, 0, 1).compare(&Version::new(0, 1, 0)),
            Ordering::Less
        );
        assert_eq!(
            Version::new(3, 2, 1).compare(&Version::new(3, 2, 1)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_parse_inverts_display() {
        for v in [
            Version::new(0, 0, 0),
            Version::new(1, 2, 3),
            Version::new(4294967295, 0, 7),
        ] {
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_bump_kind_from_str() {
        assert_eq!("minor".parse::<VersionBump>().unwrap(), VersionBump::Minor);
        assert_eq!(" MAJOR ".parse::<VersionBump>().unwrap(), VersionBump::Major);
        assert!("keep".parse::<VersionBump>().is_err());
    }
}
