//! Main release workflow orchestration
//!
//! Drives one release from history analysis to post-publish verification.
//! Every collaborator comes in through [`ReleaseContext`], so the same
//! workflow runs against the real git/npm adapters or in-memory mocks.

use std::path::PathBuf;

use crate::analyzer::HistoryAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::credentials::CredentialResolver;
use crate::domain::Version;
use crate::error::Result;
use crate::git::Repository;
use crate::manifest::PackageManifest;
use crate::preflight::PreflightRunner;
use crate::publisher::{PublishConfig, Publisher};
use crate::registry::Registry;
use crate::release::{ReleaseTagger, TagOutcome, VerificationOutcome, Verifier};
use crate::selector::{ensure_newer, VersionSelector};
use crate::ui::{
    display_banner, display_boundary_warning, display_commit_analysis,
    display_manual_push_instruction, display_status, display_step, display_success,
    display_summary, Prompter,
};

const TOTAL_STEPS: usize = 7;

/// Per-run options for the release workflow
///
/// Config loading happens before the context is built, so only flags that
/// change the workflow itself live here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Always ask for a one-time code, even if an automation token is available
    pub use_otp: bool,
}

/// Collaborators for one invocation, constructed by the caller
pub struct ReleaseContext<'a> {
    pub config: &'a Config,
    pub package_dir: PathBuf,
    pub repo: &'a dyn Repository,
    pub registry: &'a dyn Registry,
    pub prompter: &'a mut dyn Prompter,
    pub preflight: &'a dyn PreflightRunner,
}

impl<'a> ReleaseContext<'a> {
    /// Context rooted at the configured package directory
    pub fn new(
        config: &'a Config,
        repo: &'a dyn Repository,
        registry: &'a dyn Registry,
        prompter: &'a mut dyn Prompter,
        preflight: &'a dyn PreflightRunner,
    ) -> Self {
        ReleaseContext {
            config,
            package_dir: config.package.dir.clone(),
            repo,
            registry,
            prompter,
            preflight,
        }
    }
}

/// Result of a completed publication
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub package: String,
    pub version: Version,
    /// `None` when tagging failed after the package went out
    pub tag: Option<TagOutcome>,
    pub verification: VerificationOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Published(WorkflowResult),
    /// Operator declined at a confirmation prompt; nothing was published
    Cancelled,
}

/// Run the release workflow.
///
/// Stages, each gating the next:
/// 1. Analyze history and compare local vs. published version
/// 2. Select the new version (re-checked against a fresh registry query)
/// 3. Login check, tests, build
/// 4. Write the manifest version and preview the package contents
/// 5. Confirm, resolve the credential and publish
/// 6. Tag the release locally
/// 7. Verify the registry serves the new version
///
/// Failures before stage 5 leave nothing published. If the operator cancels
/// or publishing fails, the manifest version is put back.
pub fn run_release_workflow(ctx: &mut ReleaseContext<'_>, args: &ReleaseArgs) -> Result<WorkflowOutcome> {
    let manifest_path = ctx.package_dir.join(&ctx.config.package.manifest);
    let mut manifest = PackageManifest::load(&manifest_path)?;
    let package = manifest.name()?.to_string();
    let working = manifest.version()?;
    display_banner(&package);

    // Stage 1: history and registry state
    display_step(1, TOTAL_STEPS, "Analyzing changes since last release...");
    let pattern = ctx.config.tags.tag_pattern()?;
    let analyzer = HistoryAnalyzer::new(ctx.config.classification.clone());
    let analysis = analyzer.analyze_repository(ctx.repo, &pattern);
    for warning in &analysis.warnings {
        display_boundary_warning(warning);
    }
    if !analysis.commits.is_empty() {
        let since = analysis.last_tag.as_deref().unwrap_or("the beginning");
        display_commit_analysis(&analysis.commits, since);
    }
    if let Some(bump) = analysis.suggestion {
        display_status(&format!(
            "Suggested version bump: {} ({})",
            bump,
            bump.description()
        ));
    }

    let published = ctx.registry.published_version(&package)?;
    display_status(&format!("Local version: {}", working));
    match published {
        Some(p) => {
            display_status(&format!("Published version: {}", p));
            show_package_info(ctx.registry, &package);
            if working <= p {
                display_boundary_warning(&BoundaryWarning::LocalVersionNotAhead {
                    local: working,
                    published: p,
                });
            }
        }
        None => display_status("Package has not been published yet"),
    }

    if analysis.suggestion.is_none()
        && !ctx.prompter.confirm("No changes detected. Publish anyway?")?
    {
        display_status("Publication cancelled.");
        return Ok(WorkflowOutcome::Cancelled);
    }

    // Stage 2: version selection
    display_step(2, TOTAL_STEPS, "Selecting version...");
    let selector = VersionSelector::new(working, analysis.suggestion, published);
    let version = selector.select(&mut *ctx.prompter)?;
    // The registry may have moved while the operator was choosing
    let latest = ctx.registry.published_version(&package)?;
    ensure_newer(&version, latest.as_ref())?;

    // Stage 3: preflight
    display_step(3, TOTAL_STEPS, "Running preflight checks...");
    let publisher = Publisher::new(
        ctx.registry,
        &PublishConfig::from_config(ctx.config),
        &ctx.package_dir,
    );
    let user = publisher.ensure_logged_in()?;
    display_success(&format!("Logged in as {}", user));
    publisher.run_preflight(ctx.preflight)?;
    display_success("Tests and build passed");

    // Stage 4: manifest and contents
    display_step(4, TOTAL_STEPS, "Preparing package...");
    let version_changed = version != working;
    if version_changed {
        manifest.set_version(&version);
        manifest.save()?;
        display_success(&format!("Updated {} to {}", ctx.config.package.manifest, version));
    }
    match ctx.registry.pack_preview(&ctx.package_dir) {
        Ok(listing) => println!("{}", listing.trim_end()),
        Err(e) => display_boundary_warning(&BoundaryWarning::PackPreviewUnavailable {
            reason: e.to_string(),
        }),
    }

    // Stage 5: publish
    display_step(5, TOTAL_STEPS, "Publishing...");
    let resolver = CredentialResolver::new(&ctx.config.credentials, &ctx.package_dir);
    let published_now = confirm_and_publish(
        &mut *ctx.prompter,
        &resolver,
        &publisher,
        args.use_otp,
        &package,
        &version,
    );
    match published_now {
        Ok(true) => {}
        Ok(false) => {
            restore_manifest_version(&mut manifest, &working, version_changed)?;
            display_status("Publication cancelled.");
            return Ok(WorkflowOutcome::Cancelled);
        }
        Err(e) => {
            if let Err(rollback) = restore_manifest_version(&mut manifest, &working, version_changed) {
                tracing::error!(error = %rollback, "could not restore manifest version");
            }
            return Err(e);
        }
    }
    display_success(&format!("Published {}@{}", package, version));

    // Stage 6: tag
    display_step(6, TOTAL_STEPS, "Tagging release...");
    let tag_name = pattern.format(&version);
    let tagger = ReleaseTagger::new(ctx.repo, pattern, ctx.config.tags.remote.clone());
    let tag = match tagger.tag_release(&version) {
        Ok(outcome) => {
            match &outcome {
                TagOutcome::Created { tag, push_command } => {
                    display_success(&format!("Created tag {}", tag));
                    display_manual_push_instruction(push_command);
                }
                TagOutcome::AlreadyExists { tag } => {
                    display_boundary_warning(&BoundaryWarning::TagAlreadyExists { tag: tag.clone() })
                }
            }
            Some(outcome)
        }
        Err(e) => {
            display_boundary_warning(&BoundaryWarning::TagCreationFailed {
                tag: tag_name,
                reason: e.to_string(),
            });
            None
        }
    };

    // Stage 7: verify
    display_step(7, TOTAL_STEPS, "Verifying publication...");
    let verification =
        Verifier::new(ctx.config.registry.verify_delay()).verify(ctx.registry, &package, &version);
    match &verification {
        VerificationOutcome::Confirmed => {
            display_success(&format!("Registry now serves {}@{}", package, version))
        }
        VerificationOutcome::Pending { observed } => {
            display_boundary_warning(&BoundaryWarning::VerificationPending {
                package: package.clone(),
                expected: version,
                observed: *observed,
            })
        }
    }

    display_summary(&package, &version.to_string());
    Ok(WorkflowOutcome::Published(WorkflowResult {
        package,
        version,
        tag,
        verification,
    }))
}

/// Description and dist-tags of the published package. Informational only.
fn show_package_info(registry: &dyn Registry, package: &str) {
    match registry.package_info(package) {
        Ok(Some(info)) => {
            if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
                display_status(&format!("Description: {}", description));
            }
            if !info.dist_tags.is_empty() {
                let tags: Vec<String> = info
                    .dist_tags
                    .iter()
                    .map(|(tag, version)| format!("{}={}", tag, version))
                    .collect();
                display_status(&format!("Dist-tags: {}", tags.join(", ")));
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read package metadata"),
    }
}

/// Final confirmation, then credential and publish. `Ok(false)` means declined.
fn confirm_and_publish(
    prompter: &mut dyn Prompter,
    resolver: &CredentialResolver,
    publisher: &Publisher<'_>,
    use_otp: bool,
    package: &str,
    version: &Version,
) -> Result<bool> {
    if !prompter.confirm(&format!("Ready to publish {}@{}. Continue?", package, version))? {
        return Ok(false);
    }

    let credential = resolver.resolve(use_otp, prompter)?;
    tracing::info!(mode = credential.mode(), "publishing");
    publisher.publish(&credential)?;
    Ok(true)
}

fn restore_manifest_version(manifest: &mut PackageManifest, working: &Version, changed: bool) -> Result<()> {
    if !changed {
        return Ok(());
    }
    manifest.set_version(working);
    manifest.save()?;
    display_status(&format!("Restored manifest version to {}", working));
    Ok(())
}
