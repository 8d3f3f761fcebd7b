use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::{branch_major, CheckRun, CommitState, PullRequest, Release};
use crate::error::{DevkitError, Result};
use crate::host::{RepoRef, RepositoryHost};

/// Mock repository host for testing without network access
///
/// Data is keyed by branch name; the repository argument is ignored.
pub struct MockHost {
    releases: HashMap<String, Release>,
    pull_requests: HashMap<String, Vec<PullRequest>>,
    branch_heads: HashMap<String, String>,
    statuses: HashMap<String, CommitState>,
    check_runs: HashMap<String, Vec<CheckRun>>,
    failing_status: bool,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockHost {
            releases: HashMap::new(),
            pull_requests: HashMap::new(),
            branch_heads: HashMap::new(),
            statuses: HashMap::new(),
            check_runs: HashMap::new(),
            failing_status: false,
        }
    }

    /// Set the latest release of a branch
    pub fn add_release(&mut self, branch: impl Into<String>, release: Release) {
        self.releases.insert(branch.into(), release);
    }

    /// Add a merged pull request to a branch
    pub fn add_pull_request(&mut self, branch: impl Into<String>, pull_request: PullRequest) {
        self.pull_requests
            .entry(branch.into())
            .or_default()
            .push(pull_request);
    }

    /// Set a branch head
    pub fn set_branch_head(&mut self, branch: impl Into<String>, sha: impl Into<String>) {
        self.branch_heads.insert(branch.into(), sha.into());
    }

    /// Set the combined status of a sha
    pub fn set_status(&mut self, sha: impl Into<String>, state: CommitState) {
        self.statuses.insert(sha.into(), state);
    }

    /// Add a check run to a sha
    pub fn add_check_run(&mut self, sha: impl Into<String>, run: CheckRun) {
        self.check_runs.entry(sha.into()).or_default().push(run);
    }

    /// Make status and check-run queries fail as a host outage would
    pub fn fail_status_queries(&mut self) {
        self.failing_status = true;
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryHost for MockHost {
    fn latest_release(&self, _repo: &RepoRef, branch: &str) -> Result<Option<Release>> {
        let major = branch_major(branch)?;
        Ok(self
            .releases
            .get(branch)
            .filter(|release| branch_major(release.tag.as_str()).ok() == Some(major))
            .cloned())
    }

    fn merged_pull_requests(
        &self,
        _repo: &RepoRef,
        branch: &str,
        since: Option<DateTime<Utc>>,
        exclude_author: &str,
    ) -> Result<Vec<PullRequest>> {
        let mut pull_requests: Vec<PullRequest> = self
            .pull_requests
            .get(branch)
            .into_iter()
            .flatten()
            .filter(|pr| since.map_or(true, |date| pr.merged_at > date))
            .filter(|pr| pr.user.login != exclude_author)
            .cloned()
            .collect();

        pull_requests.sort_by_key(|pr| pr.merged_at);
        Ok(pull_requests)
    }

    fn branch_head(&self, _repo: &RepoRef, branch: &str) -> Result<String> {
        self.branch_heads
            .get(branch)
            .cloned()
            .ok_or_else(|| DevkitError::host(404, format!("Branch not found: {}", branch)))
    }

    fn combined_status(&self, _repo: &RepoRef, sha: &str) -> Result<CommitState> {
        if self.failing_status {
            return Err(DevkitError::host(502, "Bad gateway"));
        }
        Ok(self
            .statuses
            .get(sha)
            .copied()
            .unwrap_or(CommitState::Pending))
    }

    fn check_runs(&self, _repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>> {
        if self.failing_status {
            return Err(DevkitError::host(502, "Bad gateway"));
        }
        Ok(self.check_runs.get(sha).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Tag, User};
    use chrono::TimeZone;

    fn repo() -> RepoRef {
        RepoRef::new("acme", "lib")
    }

    fn pull_request(number: u64, login: &str, day: u32) -> PullRequest {
        PullRequest {
            number,
            title: format!("PR {}", number),
            body: String::new(),
            labels: vec![],
            merged_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            html_url: format!("https://github.com/acme/lib/pull/{}", number),
            user: User {
                login: login.to_string(),
                html_url: format!("https://github.com/{}", login),
            },
        }
    }

    #[test]
    fn test_mock_host_release() {
        let mut host = MockHost::new();
        host.add_release(
            "1.x",
            Release {
                tag: Tag::parse("1.4.0").unwrap(),
                published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            },
        );

        assert!(host.latest_release(&repo(), "1.x").unwrap().is_some());
        assert!(host.latest_release(&repo(), "2.x").unwrap().is_none());
    }

    #[test]
    fn test_mock_host_filters_pull_requests() {
        let mut host = MockHost::new();
        host.add_pull_request("1.x", pull_request(3, "bob", 5));
        host.add_pull_request("1.x", pull_request(1, "alice", 1));
        host.add_pull_request("1.x", pull_request(2, "SonataCI", 3));

        let since = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let prs = host
            .merged_pull_requests(&repo(), "1.x", Some(since), "SonataCI")
            .unwrap();
        assert_eq!(prs.iter().map(|pr| pr.number).collect::<Vec<_>>(), vec![3]);

        let prs = host
            .merged_pull_requests(&repo(), "1.x", None, "SonataCI")
            .unwrap();
        assert_eq!(
            prs.iter().map(|pr| pr.number).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_mock_host_status_failure() {
        let mut host = MockHost::new();
        host.fail_status_queries();
        assert!(host.combined_status(&repo(), "abc").is_err());
        assert!(host.check_runs(&repo(), "abc").is_err());
    }

    #[test]
    fn test_mock_host_default() {
        let host = MockHost::default();
        assert!(host.branch_head(&repo(), "1.x").is_err());
    }
}
