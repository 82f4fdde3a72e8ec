use thiserror::Error;

use crate::domain::Version;

/// Unified error type for pkg-publish operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Preflight check failed ({step}): {reason}")]
    PreflightFailed { step: String, reason: String },

    #[error("Not logged in to the registry: {0}")]
    NotLoggedIn(String),

    #[error(
        "No eligible version: every option derived from {working} is <= published version {}",
        display_published(.published)
    )]
    NoEligibleVersion {
        working: Version,
        published: Option<Version>,
    },

    #[error("Registry now serves {published}; selected version {selected} is no longer newer")]
    SelectionOutdated { selected: Version, published: Version },

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Publish failed: {reason}")]
    PublishFailed { reason: String, hint: Option<String> },

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_published(published: &Option<Version>) -> String {
    published
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

/// Convenience type alias for Results in pkg-publish
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat(msg.into())
    }

    pub fn preflight(step: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::PreflightFailed {
            step: step.into(),
            reason: reason.into(),
        }
    }

    pub fn credential(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidCredential(msg.into())
    }

    pub fn registry(msg: impl Into<String>) -> Self {
        ReleaseError::Registry(msg.into())
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// Create a publish failure carrying remediation text for the operator
    pub fn publish_failed(reason: impl Into<String>, hint: Option<&str>) -> Self {
        ReleaseError::PublishFailed {
            reason: reason.into(),
            hint: hint.map(str::to_string),
        }
    }

    /// Remediation text attached to the error, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            ReleaseError::PublishFailed { hint, .. } => hint.as_deref(),
            ReleaseError::NoEligibleVersion { .. } => {
                Some("Edit the manifest version to one higher than the published version")
            }
            ReleaseError::SelectionOutdated { .. } => {
                Some("Another release went out meanwhile; re-run to pick a newer version")
            }
            ReleaseError::InvalidCredential(_) => Some("Re-run and enter a valid one-time code"),
            _ => None,
        }
    }
}
