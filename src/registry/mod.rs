//! Package registry abstraction
//!
//! - [npm::NpmRegistry]: drives the `npm` CLI
//! - [mock::MockRegistry]: in-memory registry for tests

pub mod mock;
pub mod npm;

pub use mock::{MockRegistry, PublishRecord};
pub use npm::NpmRegistry;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::domain::Version;
use crate::error::Result;

/// Options for one publish invocation
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PublishRequest {
    pub access: Option<String>,
    /// One-time code for two-factor authentication
    pub otp: Option<String>,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("access", &self.access)
            .field("otp", &self.otp.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Package metadata as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: BTreeMap<String, String>,
}

/// Registry operations used by the release workflow
pub trait Registry {
    /// Logged-in user name, or `None` when not authenticated
    fn whoami(&self) -> Result<Option<String>>;

    /// Interactive login
    fn login(&self) -> Result<()>;

    /// Version the registry currently serves; `None` if never published
    fn published_version(&self, package: &str) -> Result<Option<Version>>;

    /// Package metadata; `None` if never published
    fn package_info(&self, package: &str) -> Result<Option<PackageInfo>>;

    /// Listing of what would be uploaded from `dir`
    fn pack_preview(&self, dir: &Path) -> Result<String>;

    /// Publish the package in `dir`
    fn publish(&self, dir: &Path, request: &PublishRequest) -> Result<()>;
}
