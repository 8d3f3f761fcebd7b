use crate::analyzer::changelog_aggregator::aggregate;
use crate::analyzer::changelog_parser::parse_changelog;
use crate::analyzer::version_calculator::compute_next;
use crate::boundary::ReleaseWarning;
use crate::config::{Branch, Config, Project};
use crate::domain::{CheckRun, CommitState, NextRelease, ReleasePullRequest, Stability, Tag};
use crate::error::{DevkitError, Result};
use crate::host::{RepoRef, RepositoryHost};

/// Determines the next release of a project branch from the pull requests
/// merged since its latest release.
pub struct ReleaseDetermination<H: RepositoryHost> {
    host: H,
    organization: String,
    bot_login: String,
}

struct StatusSnapshot {
    state: CommitState,
    check_runs: Vec<CheckRun>,
    warning: Option<ReleaseWarning>,
}

impl<H: RepositoryHost> ReleaseDetermination<H> {
    /// Create a release determination over a repository host
    pub fn new(host: H, organization: impl Into<String>, bot_login: impl Into<String>) -> Self {
        ReleaseDetermination {
            host,
            organization: organization.into(),
            bot_login: bot_login.into(),
        }
    }

    /// Create from the application settings
    pub fn from_config(host: H, config: &Config) -> Self {
        Self::new(host, &config.github.organization, &config.github.bot_login)
    }

    /// Compute the next release of one project branch.
    ///
    /// Fails with [DevkitError::NoPullRequestsMergedSinceLastRelease] when
    /// nothing was merged since the baseline; host errors propagate as-is.
    pub fn determine(&self, project: &Project, branch: &Branch) -> Result<NextRelease> {
        let repo = project.repo_ref(&self.organization);
        let mut warnings = Vec::new();

        let (current_tag, since) = match self.host.latest_release(&repo, &branch.name)? {
            Some(release) => (release.tag, Some(release.published_at)),
            None => {
                let placeholder = Tag::initial_baseline(&branch.name)?;
                tracing::debug!(repository = %repo, branch = %branch.name, %placeholder, "no release yet");
                warnings.push(ReleaseWarning::NoBaselineRelease {
                    branch: branch.name.clone(),
                    placeholder: placeholder.to_string(),
                });
                (placeholder, None)
            }
        };

        // Independent reads; both are joined before any analysis
        let (pull_requests, status) = rayon::join(
            || {
                self.host
                    .merged_pull_requests(&repo, &branch.name, since, &self.bot_login)
            },
            || self.fetch_status(&repo, &branch.name),
        );
        let pull_requests = pull_requests?;

        if pull_requests.is_empty() {
            return Err(DevkitError::NoPullRequestsMergedSinceLastRelease {
                project: project.name.clone(),
                branch: branch.name.clone(),
                since,
            });
        }

        let pull_requests: Vec<ReleasePullRequest> = pull_requests
            .into_iter()
            .map(|pull_request| ReleasePullRequest {
                stability: pull_request.stability(),
                changelog: parse_changelog(&pull_request),
                pull_request,
            })
            .collect();

        let stabilities: Vec<Stability> = pull_requests.iter().map(|pr| pr.stability).collect();
        let next_tag = compute_next(&current_tag, &stabilities)?;

        let aggregation = aggregate(
            next_tag.as_str(),
            pull_requests
                .iter()
                .map(|pr| (pr.pull_request.number, &pr.changelog)),
        );
        warnings.extend(aggregation.warnings);
        warnings.extend(status.warning);

        tracing::debug!(
            repository = %repo,
            branch = %branch.name,
            current = %current_tag,
            next = %next_tag,
            pull_requests = pull_requests.len(),
            "release determined"
        );

        Ok(NextRelease {
            project: project.name.clone(),
            branch: branch.name.clone(),
            current_tag,
            next_tag,
            status: status.state,
            check_runs: status.check_runs,
            pull_requests,
            changelog: aggregation.changelog,
            warnings,
        })
    }

    /// Status of the branch tip; any failure degrades to unknown.
    fn fetch_status(&self, repo: &RepoRef, branch: &str) -> StatusSnapshot {
        let fetched = self.host.branch_head(repo, branch).and_then(|sha| {
            let state = self.host.combined_status(repo, &sha)?;
            let check_runs = self.host.check_runs(repo, &sha)?;
            Ok((state, check_runs))
        });

        match fetched {
            Ok((state, check_runs)) => StatusSnapshot {
                state: state.combine(&check_runs),
                check_runs,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(repository = %repo, branch, error = %e, "commit status unavailable");
                StatusSnapshot {
                    state: CommitState::Unknown,
                    check_runs: Vec::new(),
                    warning: Some(ReleaseWarning::StatusUnavailable {
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }
}
