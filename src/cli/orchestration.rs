//! Batch release workflow
//!
//! Runs release determination over many project branches. Each branch is
//! computed independently; a failure is recorded on its entry and never
//! aborts the others.

use rayon::prelude::*;

use crate::analyzer::ReleaseDetermination;
use crate::config::{Branch, Project};
use crate::domain::NextRelease;
use crate::error::{DevkitError, Result};
use crate::host::RepositoryHost;

/// Selection of project branches to compute
///
/// Mirrors the CLI arguments so the workflow can be called without clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchArgs {
    /// Project names; empty means every configured project
    pub projects: Vec<String>,

    /// Branch name; `None` means every configured branch
    pub branch: Option<String>,
}

/// Outcome of one project branch
#[derive(Debug)]
pub enum BatchOutcome {
    Released(NextRelease),
    /// Nothing merged since the last release
    Skipped(DevkitError),
    Failed(DevkitError),
}

/// Result for one project branch of a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub project: String,
    pub branch: String,
    pub outcome: BatchOutcome,
}

impl BatchEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Failed(_))
    }
}

/// Resolve the project branches selected by `args`, in configuration order.
pub fn select_targets<'a>(
    projects: &'a [Project],
    args: &BatchArgs,
) -> Result<Vec<(&'a Project, &'a Branch)>> {
    for name in &args.projects {
        if !projects.iter().any(|project| &project.name == name) {
            return Err(DevkitError::config(format!("Unknown project '{}'", name)));
        }
    }

    let targets: Vec<(&Project, &Branch)> = projects
        .iter()
        .filter(|project| args.projects.is_empty() || args.projects.contains(&project.name))
        .flat_map(|project| {
            project
                .branches
                .iter()
                .filter(|branch| args.branch.as_ref().map_or(true, |name| &branch.name == name))
                .map(move |branch| (project, branch))
        })
        .collect();

    if targets.is_empty() {
        return Err(DevkitError::config(match &args.branch {
            Some(branch) => format!("No selected project has a branch '{}'", branch),
            None => "No project branches selected".to_string(),
        }));
    }

    Ok(targets)
}

/// Compute the next release of every target in parallel.
///
/// Entries are returned in the order of `targets`.
pub fn run_batch<H: RepositoryHost>(
    determination: &ReleaseDetermination<H>,
    targets: &[(&Project, &Branch)],
) -> Vec<BatchEntry> {
    targets
        .par_iter()
        .map(|(project, branch)| {
            let outcome = match determination.determine(project, branch) {
                Ok(release) => BatchOutcome::Released(release),
                Err(e) if e.is_terminal_skip() => BatchOutcome::Skipped(e),
                Err(e) => {
                    tracing::warn!(project = %project.name, branch = %branch.name, error = %e, "release determination failed");
                    BatchOutcome::Failed(e)
                }
            };

            BatchEntry {
                project: project.name.clone(),
                branch: branch.name.clone(),
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_projects;

    const PROJECTS: &str = "a:\n  branches:\n    1.x: {}\n    2.x: {}\nb:\n  branches:\n    2.x: {}\n";

    #[test]
    fn test_select_all() {
        let projects = parse_projects(PROJECTS).unwrap();
        let targets = select_targets(&projects, &BatchArgs::default()).unwrap();
        let names: Vec<(&str, &str)> = targets
            .iter()
            .map(|(p, b)| (p.name.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(names, vec![("a", "2.x"), ("a", "1.x"), ("b", "2.x")]);
    }

    #[test]
    fn test_select_branch() {
        let projects = parse_projects(PROJECTS).unwrap();
        let args = BatchArgs {
            projects: vec![],
            branch: Some("1.x".to_string()),
        };
        let targets = select_targets(&projects, &args).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0.name, "a");
    }

    #[test]
    fn test_unknown_project() {
        let projects = parse_projects(PROJECTS).unwrap();
        let args = BatchArgs {
            projects: vec!["c".to_string()],
            branch: None,
        };
        assert!(select_targets(&projects, &args).is_err());
    }

    #[test]
    fn test_unknown_branch() {
        let projects = parse_projects(PROJECTS).unwrap();
        let args = BatchArgs {
            projects: vec!["b".to_string()],
            branch: Some("1.x".to_string()),
        };
        assert!(select_targets(&projects, &args).is_err());
    }
}
