//! Pure formatting functions for UI output.
//!
//! `render_*` functions build the text and are testable; `display_*`
//! functions print it.

use console::style;

use crate::boundary::ReleaseWarning;
use crate::config::Project;
use crate::domain::{CommitState, NextRelease, Stability};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display a project branch skipped because nothing was merged.
pub fn display_skipped(project: &str, branch: &str, reason: &str) {
    println!(
        "{} {} {}: {}",
        style("-").dim(),
        style(project).bold(),
        branch,
        style(reason).dim()
    );
}

/// Display configured projects and their branches.
pub fn display_available_projects(projects: &[Project]) {
    println!("{}", style("Configured projects:").bold());
    for project in projects {
        let branches: Vec<&str> = project.branches.iter().map(|b| b.name.as_str()).collect();
        println!("  - {} ({})", project.name, branches.join(", "));
    }
}

/// Display the full report of a next release.
pub fn display_release(release: &NextRelease) {
    println!("{}", render_release(release));
    for warning in release.warnings() {
        display_warning(warning);
    }
}

/// Display only the changelog markdown of a release.
pub fn display_changelog(release: &NextRelease) {
    println!("{}\n", release.changelog().as_markdown());
}

fn styled_state(state: CommitState) -> String {
    match state {
        CommitState::Success => style(state.as_str()).green().to_string(),
        CommitState::Pending => style(state.as_str()).yellow().to_string(),
        CommitState::Failure => style(state.as_str()).red().to_string(),
        CommitState::Unknown => style(state.as_str()).dim().to_string(),
    }
}

fn styled_stability(stability: Stability) -> String {
    match stability {
        Stability::Minor => style(stability.as_str()).green().to_string(),
        Stability::Patch => style(stability.as_str()).blue().to_string(),
        Stability::Pedantic => style(stability.as_str()).yellow().to_string(),
        Stability::Unknown => style(stability.as_str()).red().to_string(),
    }
}

/// Text report: header line, pull requests, changelog.
pub fn render_release(release: &NextRelease) -> String {
    let mut out = String::new();

    let header = if release.is_needed() {
        format!(
            "{} {}: {} -> {} ({})",
            style("Next release of").bold(),
            style(format!("{} {}", release.project(), release.branch())).cyan(),
            style(release.current_tag()).red(),
            style(release.next_tag()).green(),
            styled_state(release.status())
        )
    } else {
        format!(
            "{} {} {}: {} ({})",
            style("No release needed for").bold(),
            style(release.project()).cyan(),
            release.branch(),
            release.current_tag(),
            styled_state(release.status())
        )
    };
    out.push_str(&header);
    out.push('\n');

    for pr in release.pull_requests() {
        out.push_str(&format!(
            "  #{} {} [{}] @{}\n",
            pr.pull_request.number,
            pr.pull_request.title,
            styled_stability(pr.stability),
            pr.pull_request.user.login
        ));
    }

    if !release.changelog().is_empty() {
        out.push('\n');
        out.push_str(&release.changelog().as_markdown());
        out.push('\n');
    }

    out
}
