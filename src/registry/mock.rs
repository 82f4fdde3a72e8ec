use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::manifest::PackageManifest;
use crate::registry::{PackageInfo, PublishRequest, Registry};

/// What the mock saw when `publish` was called
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRecord {
    pub dir: PathBuf,
    pub request: PublishRequest,
    /// Content of the watched auth file at publish time, if it existed
    pub auth_file: Option<String>,
}

/// In-memory registry for testing without network access
///
/// A successful publish makes the manifest version in the published directory
/// the served version, unless propagation is held back.
pub struct MockRegistry {
    package: String,
    user: RefCell<Option<String>>,
    login_user: Option<String>,
    published: RefCell<Option<Version>>,
    queued_versions: RefCell<VecDeque<Option<Version>>>,
    fail_publish: Option<String>,
    hold_propagation: bool,
    auth_probe: Option<PathBuf>,
    publishes: RefCell<Vec<PublishRecord>>,
    login_calls: Cell<usize>,
    info_calls: Cell<usize>,
}

impl MockRegistry {
    pub fn new(package: impl Into<String>) -> Self {
        MockRegistry {
            package: package.into(),
            user: RefCell::new(Some("releaser".to_string())),
            login_user: None,
            published: RefCell::new(None),
            queued_versions: RefCell::new(VecDeque::new()),
            fail_publish: None,
            hold_propagation: false,
            auth_probe: None,
            publishes: RefCell::new(Vec::new()),
            login_calls: Cell::new(0),
            info_calls: Cell::new(0),
        }
    }

    pub fn with_published(self, version: Version) -> Self {
        *self.published.borrow_mut() = Some(version);
        self
    }

    /// Start logged out; `login` logs in as `login_user` if given
    pub fn logged_out(mut self, login_user: Option<&str>) -> Self {
        *self.user.borrow_mut() = None;
        self.login_user = login_user.map(str::to_string);
        self
    }

    pub fn failing_publish(mut self, reason: impl Into<String>) -> Self {
        self.fail_publish = Some(reason.into());
        self
    }

    /// Keep serving the old version after a successful publish
    pub fn holding_propagation(mut self) -> Self {
        self.hold_propagation = true;
        self
    }

    /// Record the content of `path` whenever `publish` is called
    pub fn watching_auth_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth_probe = Some(path.into());
        self
    }

    /// Answer the next version query with `version`, e.g. to simulate a concurrent release
    pub fn queue_published(&self, version: Option<Version>) {
        self.queued_versions.borrow_mut().push_back(version);
    }

    pub fn publishes(&self) -> Vec<PublishRecord> {
        self.publishes.borrow().clone()
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.get()
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.get()
    }

    fn check_package(&self, package: &str) -> Result<()> {
        if package != self.package {
            return Err(ReleaseError::registry(format!(
                "unexpected package '{}'",
                package
            )));
        }
        Ok(())
    }
}

impl Registry for MockRegistry {
    fn whoami(&self) -> Result<Option<String>> {
        Ok(self.user.borrow().clone())
    }

    fn login(&self) -> Result<()> {
        self.login_calls.set(self.login_calls.get() + 1);
        match &self.login_user {
            Some(user) => {
                *self.user.borrow_mut() = Some(user.clone());
                Ok(())
            }
            None => Err(ReleaseError::NotLoggedIn("login rejected".to_string())),
        }
    }

    fn published_version(&self, package: &str) -> Result<Option<Version>> {
        self.check_package(package)?;
        if let Some(queued) = self.queued_versions.borrow_mut().pop_front() {
            return Ok(queued);
        }
        Ok(*self.published.borrow())
    }

    fn package_info(&self, package: &str) -> Result<Option<PackageInfo>> {
        self.check_package(package)?;
        self.info_calls.set(self.info_calls.get() + 1);
        Ok(self.published.borrow().map(|v| PackageInfo {
            name: self.package.clone(),
            version: v.to_string(),
            description: Some(format!("{} test package", self.package)),
            dist_tags: [("latest".to_string(), v.to_string())].into_iter().collect(),
        }))
    }

    fn pack_preview(&self, dir: &Path) -> Result<String> {
        Ok(format!("Tarball Contents\n{}/package.json", dir.display()))
    }

    fn publish(&self, dir: &Path, request: &PublishRequest) -> Result<()> {
        let auth_file = self
            .auth_probe
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok());
        self.publishes.borrow_mut().push(PublishRecord {
            dir: dir.to_path_buf(),
            request: request.clone(),
            auth_file,
        });

        if let Some(reason) = &self.fail_publish {
            return Err(ReleaseError::registry(reason.clone()));
        }

        if !self.hold_propagation {
            let manifest = PackageManifest::load(dir.join("package.json"))?;
            *self.published.borrow_mut() = Some(manifest.version()?);
        }
        Ok(())
    }
}
