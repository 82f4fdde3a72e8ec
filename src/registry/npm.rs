use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, instrument, warn};

use crate::config::RegistryConfig;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::registry::{PackageInfo, PublishRequest, Registry};

/// Registry backed by the `npm` command-line client
pub struct NpmRegistry {
    client: String,
    registry_url: String,
}

impl NpmRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        NpmRegistry {
            client: config.client.clone(),
            registry_url: config.url.clone(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.client);
        cmd.args(args).arg("--registry").arg(&self.registry_url);
        cmd
    }

    fn capture(&self, mut cmd: Command, what: &str) -> Result<Output> {
        cmd.output().map_err(|e| {
            ReleaseError::registry(format!("failed to run {} {}: {}", self.client, what, e))
        })
    }
}

/// `npm view` reports unknown packages with an E404 code
fn is_not_found(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr.contains("E404") || stderr.contains("404 Not Found")
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    format!(
        "exit code {}: {}",
        output.status.code().unwrap_or(-1),
        first.trim()
    )
}

impl Registry for NpmRegistry {
    #[instrument(skip(self))]
    fn whoami(&self) -> Result<Option<String>> {
        let output = self.capture(self.command(&["whoami"]), "whoami")?;
        if !output.status.success() {
            debug!(reason = %failure_reason(&output), "not logged in");
            return Ok(None);
        }
        let user = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(user).filter(|u| !u.is_empty()))
    }

    #[instrument(skip(self))]
    fn login(&self) -> Result<()> {
        let status = self.command(&["login"]).status().map_err(|e| {
            ReleaseError::registry(format!("failed to run {} login: {}", self.client, e))
        })?;
        if !status.success() {
            return Err(ReleaseError::NotLoggedIn(format!(
                "{} login exited with code {}",
                self.client,
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }

    /// Any failed `view` counts as never published
    #[instrument(skip(self))]
    fn published_version(&self, package: &str) -> Result<Option<Version>> {
        let output = self.capture(self.command(&["view", package, "version"]), "view")?;
        if !output.status.success() {
            if is_not_found(&output) {
                debug!("package not in registry");
            } else {
                warn!(reason = %failure_reason(&output), "version query failed, treating as unpublished");
            }
            return Ok(None);
        }

        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if raw.is_empty() {
            return Ok(None);
        }
        Version::parse(&raw).map(Some)
    }

    #[instrument(skip(self))]
    fn package_info(&self, package: &str) -> Result<Option<PackageInfo>> {
        let output = self.capture(self.command(&["view", package, "--json"]), "view")?;
        if !output.status.success() {
            if is_not_found(&output) {
                return Ok(None);
            }
            return Err(ReleaseError::registry(format!(
                "cannot view {}: {}",
                package,
                failure_reason(&output)
            )));
        }
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&output.stdout)?))
    }

    #[instrument(skip(self))]
    fn pack_preview(&self, dir: &Path) -> Result<String> {
        let mut cmd = self.command(&["pack", "--dry-run"]);
        cmd.current_dir(dir);
        let output = self.capture(cmd, "pack")?;
        if !output.status.success() {
            return Err(ReleaseError::registry(format!(
                "pack --dry-run failed: {}",
                failure_reason(&output)
            )));
        }
        // npm prints the tarball listing on stderr
        let mut listing = String::from_utf8_lossy(&output.stderr).into_owned();
        listing.push_str(&String::from_utf8_lossy(&output.stdout));
        Ok(listing)
    }

    #[instrument(skip(self, request), fields(access = ?request.access, otp = request.otp.is_some()))]
    fn publish(&self, dir: &Path, request: &PublishRequest) -> Result<()> {
        let mut cmd = self.command(&["publish"]);
        cmd.current_dir(dir);
        if let Some(access) = &request.access {
            cmd.arg("--access").arg(access);
        }
        if let Some(otp) = &request.otp {
            cmd.arg(format!("--otp={}", otp));
        }

        let status = cmd.status().map_err(|e| {
            ReleaseError::registry(format!("failed to run {} publish: {}", self.client, e))
        })?;
        if !status.success() {
            return Err(ReleaseError::registry(format!(
                "{} publish exited with code {}",
                self.client,
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }
}
