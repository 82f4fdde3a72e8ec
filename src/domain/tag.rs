use crate::domain::Version;
use crate::error::{ReleaseError, Result};

const PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    prefix: String,
    suffix: String,
}

impl TagPattern {
    /// Create a new tag pattern; it must contain exactly one `{version}` placeholder
    pub fn new(pattern: &str) -> Result<Self> {
        let parts: Vec<&str> = pattern.split(PLACEHOLDER).collect();
        if parts.len() != 2 {
            return Err(ReleaseError::tag(format!(
                "Invalid pattern '{}': should have exactly one {{version}} placeholder",
                pattern
            )));
        }

        Ok(TagPattern {
            prefix: parts[0].to_string(),
            suffix: parts[1].to_string(),
        })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}{}", self.prefix, version, self.suffix)
    }

    /// Extract the version from a tag produced by this pattern.
    ///
    /// Returns `None` when the tag does not carry the pattern's prefix/suffix,
    /// and `Some(Err(_))` when it does but the middle is not a valid version.
    pub fn parse_version(&self, tag: &str) -> Option<Result<Version>> {
        let rest = tag.strip_prefix(self.prefix.as_str())?;
        let middle = rest.strip_suffix(self.suffix.as_str())?;
        Some(Version::parse(middle))
    }

    /// Whether a tag was produced by this pattern
    pub fn matches(&self, tag: &str) -> bool {
        matches!(self.parse_version(tag), Some(Ok(_)))
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            prefix: "v".to_string(),
            suffix: String::new(),
        }
    }
}

impl std::fmt::Display for TagPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, PLACEHOLDER, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}-final").unwrap();
        assert_eq!(
            pattern.format(&Version::new(1, 2, 3)),
            "release-1.2.3-final"
        );
    }

    #[test]
    fn test_pattern_requires_single_placeholder() {
        assert!(TagPattern::new("v").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = TagPattern::default();
        assert!(pattern.matches("v1.2.3"));
        assert!(!pattern.matches("release-1.2.3"));
        assert!(!pattern.matches("vnext"));
    }

    #[test]
    fn test_parse_version_distinguishes_foreign_and_malformed() {
        let pattern = TagPattern::default();
        assert!(pattern.parse_version("release-1.0.0").is_none());
        assert!(matches!(pattern.parse_version("v1.0"), Some(Err(_))));
        assert_eq!(
            pattern.parse_version("v2.0.1").unwrap().unwrap(),
            Version::new(2, 0, 1)
        );
    }

    #[test]
    fn test_display_round_trips_pattern() {
        let pattern = TagPattern::new("pkg@{version}").unwrap();
        assert_eq!(pattern.to_string(), "pkg@{version}");
    }
}
