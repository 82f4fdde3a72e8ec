//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Step headers and boundary warnings are also emitted as `tracing` events.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::git::CommitInfo;

const MAX_LISTED_COMMITS: usize = 10;
const RULE_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red(), style(message).red());
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(message: &str) {
    println!("{} {}", style("⚠").yellow(), style(message).yellow());
}

/// Print a numbered workflow step header, e.g. "[2/6] Running tests..."
pub fn display_step(step: usize, total: usize, message: &str) {
    tracing::info!(step, total, "{}", message);
    println!(
        "\n{}",
        style(format!("[{}/{}] {}", step, total, message))
            .cyan()
            .bold()
    );
}

pub fn display_banner(package: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", style(&rule).cyan());
    println!("{}", style(format!("  {} - release", package)).cyan().bold());
    println!("{}\n", style(&rule).cyan());
}

/// Display commits since the last release.
///
/// Shows up to 10 commits; if more exist, displays the count of remaining commits.
pub fn display_commit_analysis(commits: &[CommitInfo], last_tag: &str) {
    println!(
        "\n{}",
        style(format!(
            "Changes since {} ({} commits):",
            last_tag,
            commits.len()
        ))
        .bold()
    );

    for commit in commits.iter().take(MAX_LISTED_COMMITS) {
        println!(
            "  • {} {}",
            style(commit.short_hash()).dim(),
            style(&commit.summary).cyan()
        );
    }

    if commits.len() > MAX_LISTED_COMMITS {
        println!(
            "  ... and {} more commits",
            commits.len() - MAX_LISTED_COMMITS
        );
    }
}

/// Display a non-fatal warning and log it.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    tracing::warn!("{}", warning);
    display_warning(&warning.to_string());
}

/// Tell the operator how to push a tag that was created locally.
pub fn display_manual_push_instruction(push_command: &str) {
    println!("\nTo push the tag to remote, run:");
    println!("  {}", style(push_command).cyan());
}

/// Final summary with install hints.
pub fn display_summary(package: &str, version: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", style(&rule).green());
    println!(
        "{}",
        style(format!("  Publication complete: {}@{}", package, version))
            .green()
            .bold()
    );
    println!("{}", style(&rule).green());
    println!("\nUsers can now install with:");
    println!("  {}", style(format!("npm install -g {}", package)).cyan());
    println!("\nOr update an existing installation:");
    println!("  {}\n", style(format!("npm update -g {}", package)).cyan());
}
