//! Publishing to the registry
//!
//! With an automation token, a package-local auth file is written for exactly
//! the duration of the publish call and then put back as it was. With a
//! one-time code nothing touches the disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::Credential;
use crate::error::{ReleaseError, Result};
use crate::preflight::{PreflightRunner, PreflightStep};
use crate::registry::{PublishRequest, Registry};
use crate::ui::display_boundary_warning;

const TOKEN_FAILURE_HINT: &str = "Retry with --otp to publish using a one-time code";

/// Publish settings drawn from the `[registry]` and `[credentials]` sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub access: Option<String>,
    /// Auth file name, relative to the package directory
    pub auth_file: String,
    /// Registry host key used in the auth line, e.g. `registry.npmjs.org/`
    pub auth_key: String,
}

impl PublishConfig {
    pub fn from_config(config: &Config) -> Self {
        PublishConfig {
            access: config.registry.access.clone(),
            auth_file: config.credentials.auth_file.clone(),
            auth_key: config.registry.auth_key(),
        }
    }
}

/// Temporarily replaces a file and puts the original bytes back.
///
/// If the file did not exist it is removed again. Restoration happens in
/// [`AuthFileGuard::restore`] or, failing that, when the guard is dropped
/// (early return or panic). Drop cannot report errors, so it logs them.
#[derive(Debug)]
pub struct AuthFileGuard {
    path: PathBuf,
    original: Option<Vec<u8>>,
    restored: bool,
}

impl AuthFileGuard {
    pub fn install(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let original = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let guard = AuthFileGuard {
            path,
            original,
            restored: false,
        };
        fs::write(&guard.path, content)?;
        debug!(path = %guard.path.display(), existed = guard.original.is_some(), "installed auth file");
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Put the original content back (or delete the file if there was none)
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.put_back()?;
        Ok(())
    }

    fn put_back(&self) -> io::Result<()> {
        match &self.original {
            Some(bytes) => fs::write(&self.path, bytes),
            None => match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        }
    }
}

impl Drop for AuthFileGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.put_back() {
            display_boundary_warning(&BoundaryWarning::AuthFileRestoreFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            });
        }
    }
}

pub struct Publisher<'a> {
    registry: &'a dyn Registry,
    config: PublishConfig,
    package_dir: PathBuf,
}

impl<'a> Publisher<'a> {
    pub fn new(registry: &'a dyn Registry, config: &PublishConfig, package_dir: impl Into<PathBuf>) -> Self {
        Publisher {
            registry,
            config: config.clone(),
            package_dir: package_dir.into(),
        }
    }

    /// Make sure a registry session exists, logging in interactively if needed.
    ///
    /// Returns the logged-in user name.
    pub fn ensure_logged_in(&self) -> Result<String> {
        if let Some(user) = self.registry.whoami()? {
            return Ok(user);
        }

        info!("not logged in, starting interactive login");
        self.registry.login().map_err(|e| match e {
            ReleaseError::NotLoggedIn(_) => e,
            other => ReleaseError::NotLoggedIn(other.to_string()),
        })?;

        self.registry
            .whoami()?
            .ok_or_else(|| ReleaseError::NotLoggedIn("still not logged in after login".to_string()))
    }

    /// Run tests then build; the first failure stops the run
    pub fn run_preflight(&self, runner: &dyn PreflightRunner) -> Result<()> {
        for step in PreflightStep::ALL {
            runner.run(step).map_err(|e| match e {
                ReleaseError::PreflightFailed { .. } => e,
                other => ReleaseError::preflight(step.name(), other.to_string()),
            })?;
        }
        Ok(())
    }

    #[instrument(skip(self, credential), fields(mode = credential.mode()))]
    pub fn publish(&self, credential: &Credential) -> Result<()> {
        match credential {
            Credential::AutomationToken(token) => {
                let path = self.package_dir.join(&self.config.auth_file);
                let line = format!("//{}:_authToken={}\n", self.config.auth_key, token);
                let guard = AuthFileGuard::install(&path, &line)?;

                let published = self.registry.publish(&self.package_dir, &self.request(None));
                let restored = guard.restore();

                published.map_err(|e| {
                    ReleaseError::publish_failed(e.to_string(), Some(TOKEN_FAILURE_HINT))
                })?;
                // The package is out; a leftover auth file is reported, not fatal
                if let Err(e) = restored {
                    display_boundary_warning(&BoundaryWarning::AuthFileRestoreFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
                Ok(())
            }
            Credential::OneTimeCode(code) => self
                .registry
                .publish(&self.package_dir, &self.request(Some(code)))
                .map_err(|e| ReleaseError::publish_failed(e.to_string(), None)),
        }
    }

    fn request(&self, otp: Option<&str>) -> PublishRequest {
        PublishRequest {
            access: self.config.access.clone(),
            otp: otp.map(str::to_string),
        }
    }
}
