use std::fmt;

use crate::domain::Version;

/// Non-fatal conditions met while releasing.
/// These are reported to the operator and logged, never returned as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No release tag exists yet
    FirstRelease,
    /// No new commits since the latest release tag
    NoNewCommits { latest_tag: String },
    /// Commit history could not be read; version selection continues manually
    HistoryUnreadable { reason: String },
    /// Tag matches the release pattern but does not carry a valid version
    UnparsableTag { tag: String, reason: String },
    /// Manifest version is not ahead of what the registry serves
    LocalVersionNotAhead { local: Version, published: Version },
    /// Release tag already present; tagging was skipped
    TagAlreadyExists { tag: String },
    /// Publication succeeded but the tag could not be created
    TagCreationFailed { tag: String, reason: String },
    /// Registry does not serve the new version yet
    VerificationPending {
        package: String,
        expected: Version,
        observed: Option<Version>,
    },
    /// Package contents could not be previewed before publishing
    PackPreviewUnavailable { reason: String },
    /// Scoped auth file could not be put back during unwinding
    AuthFileRestoreFailed { path: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::FirstRelease => write!(
                f,
                "No previous release tags found. This appears to be the first release"
            ),
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::HistoryUnreadable { reason } => {
                write!(f, "Could not analyze git history: {}", reason)
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::LocalVersionNotAhead { local, published } => {
                if local == published {
                    write!(
                        f,
                        "Local version {} is the same as the published version. You must bump the version to publish",
                        local
                    )
                } else {
                    write!(
                        f,
                        "Local version {} is lower than published version {}. You must bump the version to publish",
                        local, published
                    )
                }
            }
            BoundaryWarning::TagAlreadyExists { tag } => {
                write!(f, "Git tag {} already exists", tag)
            }
            BoundaryWarning::TagCreationFailed { tag, reason } => {
                write!(f, "Could not create git tag {}: {}", tag, reason)
            }
            BoundaryWarning::VerificationPending {
                package,
                expected,
                observed,
            } => {
                write!(
                    f,
                    "Could not verify {}@{} (registry reports {}). It may take a few minutes to propagate",
                    package,
                    expected,
                    observed
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "nothing".to_string())
                )
            }
            BoundaryWarning::PackPreviewUnavailable { reason } => {
                write!(f, "Could not verify package contents: {}", reason)
            }
            BoundaryWarning::AuthFileRestoreFailed { path, reason } => {
                write!(f, "Could not restore auth file '{}': {}", path, reason)
            }
        }
    }
}
