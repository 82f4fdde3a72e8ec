use std::fmt;

use crate::domain::{Version, VersionBump};

/// What the operator picks: a bump of the working version, or the working version as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChoice {
    Bump(VersionBump),
    KeepCurrent,
}

/// A version the package may legally be published as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCandidate {
    pub choice: VersionChoice,
    pub version: Version,
    pub is_recommended: bool,
}

impl PublishCandidate {
    /// Operator-facing label, e.g. "Minor (1.3.0) - New features"
    pub fn label(&self) -> String {
        match self.choice {
            VersionChoice::Bump(kind) => {
                let name = kind.name();
                let mut chars = name.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                };
                format!("{} ({}) - {}", capitalized, self.version, kind.description())
            }
            VersionChoice::KeepCurrent => format!("Keep current ({})", self.version),
        }
    }
}

impl fmt::Display for PublishCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())?;
        if self.is_recommended {
            f.write_str(" (Recommended)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_label() {
        let candidate = PublishCandidate {
            choice: VersionChoice::Bump(VersionBump::Minor),
            version: Version::new(1, 3, 0),
            is_recommended: true,
        };
        assert_eq!(candidate.label(), "Minor (1.3.0) - New features");
        assert_eq!(
            candidate.to_string(),
            "Minor (1.3.0) - New features (Recommended)"
        );
    }

    #[test]
    fn test_keep_label() {
        let candidate = PublishCandidate {
            choice: VersionChoice::KeepCurrent,
            version: Version::new(2, 0, 0),
            is_recommended: false,
        };
        assert_eq!(candidate.to_string(), "Keep current (2.0.0)");
    }
}
