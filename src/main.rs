use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use pkg_publish::cli::{run_release_workflow, ReleaseArgs, ReleaseContext, WorkflowOutcome};
use pkg_publish::config;
use pkg_publish::git::{Git2Repository, Repository, UnavailableRepository};
use pkg_publish::manifest::PackageManifest;
use pkg_publish::preflight::ScriptExecutor;
use pkg_publish::registry::NpmRegistry;
use pkg_publish::ui::{self, TerminalPrompter};

#[derive(clap::Parser)]
#[command(
    name = "pkg-publish",
    version,
    about = "Analyze changes, pick a version, publish to npm and tag the release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Prompt for a one-time code instead of using an automation token")]
    otp: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let release_args = ReleaseArgs { use_otp: args.otp };

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let package_name = match PackageManifest::load(config.package.manifest_path())
        .and_then(|m| m.name().map(str::to_string))
    {
        Ok(name) => name,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let repo: Box<dyn Repository> = match Git2Repository::open(&config.package.dir) {
        Ok(repo) => Box::new(repo),
        Err(e) => Box::new(UnavailableRepository::new(e.to_string())),
    };
    let registry = NpmRegistry::new(&config.registry);
    let preflight = match ScriptExecutor::new(&config.package.dir, package_name, &config.preflight) {
        Ok(executor) => executor,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let mut prompter = TerminalPrompter::stdio();

    let mut ctx = ReleaseContext::new(&config, repo.as_ref(), &registry, &mut prompter, &preflight);
    match run_release_workflow(&mut ctx, &release_args) {
        Ok(WorkflowOutcome::Published(_)) | Ok(WorkflowOutcome::Cancelled) => Ok(()),
        Err(e) => {
            ui::display_error(&e.to_string());
            if let Some(hint) = e.hint() {
                ui::display_status(hint);
            }
            std::process::exit(1);
        }
    }
}

/// Console logging on stderr, controlled by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
