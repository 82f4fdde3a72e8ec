use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PreflightConfig;
use crate::error::{ReleaseError, Result};
use crate::preflight::{PackageManager, PreflightRunner, PreflightStep};

/// Runs preflight steps as package scripts (`<pm> run <script>`)
///
/// Output goes straight to the operator's terminal; only the exit status is
/// interpreted. Each step gets `PKGPUBLISH_STEP` and `PKGPUBLISH_PACKAGE` in
/// its environment.
pub struct ScriptExecutor {
    package_dir: PathBuf,
    package_name: String,
    commands: HashMap<&'static str, Vec<String>>,
}

impl ScriptExecutor {
    pub fn new(package_dir: impl Into<PathBuf>, package_name: impl Into<String>, config: &PreflightConfig) -> Result<Self> {
        let package_dir = package_dir.into();
        let pm = match &config.package_manager {
            Some(name) => name.parse::<PackageManager>()?,
            None => PackageManager::detect(&package_dir),
        };
        tracing::debug!(package_manager = %pm, "resolved package manager");

        let script = |name: &str| vec![pm.command().to_string(), "run".to_string(), name.to_string()];
        let mut commands = HashMap::new();
        commands.insert(PreflightStep::Tests.name(), script(&config.test_script));
        commands.insert(PreflightStep::Build.name(), script(&config.build_script));

        Ok(ScriptExecutor {
            package_dir,
            package_name: package_name.into(),
            commands,
        })
    }

    /// Replace the command line used for one step
    pub fn with_step_command<I, S>(mut self, step: PreflightStep, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands
            .insert(step.name(), command.into_iter().map(Into::into).collect());
        self
    }

    /// The command line a step will run
    pub fn step_command(&self, step: PreflightStep) -> Option<&[String]> {
        self.commands.get(step.name()).map(Vec::as_slice)
    }

    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }
}

impl PreflightRunner for ScriptExecutor {
    fn run(&self, step: PreflightStep) -> Result<()> {
        let command = self
            .step_command(step)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ReleaseError::preflight(step.name(), "no command configured"))?;
        let shown = command.join(" ");
        tracing::info!(step = %step, command = %shown, "running preflight step");

        let status = Command::new(&command[0])
            .args(&command[1..])
            .current_dir(&self.package_dir)
            .env("PKGPUBLISH_STEP", step.name())
            .env("PKGPUBLISH_PACKAGE", &self.package_name)
            .status()
            .map_err(|e| {
                ReleaseError::preflight(step.name(), format!("failed to run '{}': {}", shown, e))
            })?;

        if !status.success() {
            return Err(ReleaseError::preflight(
                step.name(),
                format!(
                    "'{}' exited with code {}",
                    shown,
                    status.code().unwrap_or(-1)
                ),
            ));
        }

        Ok(())
    }
}
