//! Preflight gating: tests and build must pass before anything is published.
//!
//! The workflow only relies on the [`PreflightRunner`] contract (success or a
//! `PreflightFailed` error), never on the text a tool prints.

pub mod executor;

pub use executor::ScriptExecutor;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ReleaseError, Result};

/// Gating steps, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightStep {
    Tests,
    Build,
}

impl PreflightStep {
    pub const ALL: [PreflightStep; 2] = [PreflightStep::Tests, PreflightStep::Build];

    pub fn name(&self) -> &'static str {
        match self {
            PreflightStep::Tests => "tests",
            PreflightStep::Build => "build",
        }
    }
}

impl fmt::Display for PreflightStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs one preflight step; any failure must be reported as `PreflightFailed`
pub trait PreflightRunner {
    fn run(&self, step: PreflightStep) -> Result<()>;
}

/// JavaScript package manager used to run package scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

const LOCKFILES: [(&str, PackageManager); 4] = [
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("bun.lockb", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Detect from the first lockfile present in `dir`, defaulting to npm
    pub fn detect(dir: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(file, _)| dir.join(file).exists())
            .map(|(_, pm)| *pm)
            .unwrap_or(PackageManager::Npm)
    }

    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl FromStr for PackageManager {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(ReleaseError::config(format!(
                "unknown package manager '{}'",
                other
            ))),
        }
    }
}
