use chrono::{DateTime, Utc};
use std::fmt;

use super::{Changelog, PullRequest, SectionMap, Stability, Tag};
use crate::boundary::ReleaseWarning;

/// A published release on the repository host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: Tag,
    pub published_at: DateTime<Utc>,
}

/// Aggregate CI state of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Success,
    Pending,
    Failure,
    Unknown,
}

impl CommitState {
    /// Map a combined-status `state` string from the host
    pub fn from_status(state: &str) -> Self {
        match state {
            "success" => CommitState::Success,
            "pending" => CommitState::Pending,
            "failure" | "error" => CommitState::Failure,
            _ => CommitState::Unknown,
        }
    }

    /// Fold check runs into a combined state.
    ///
    /// Any failing conclusion wins, then any unfinished run, then the
    /// combined commit status.
    pub fn combine(self, check_runs: &[CheckRun]) -> Self {
        if check_runs.iter().any(CheckRun::is_failing) {
            return CommitState::Failure;
        }
        if check_runs.iter().any(|run| !run.is_completed()) {
            return CommitState::Pending;
        }
        if self == CommitState::Unknown && !check_runs.is_empty() {
            return CommitState::Success;
        }
        self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitState::Success => "success",
            CommitState::Pending => "pending",
            CommitState::Failure => "failure",
            CommitState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CI check run attached to a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
}

impl CheckRun {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_failing(&self) -> bool {
        matches!(
            self.conclusion.as_deref(),
            Some("failure" | "timed_out" | "cancelled" | "action_required")
        )
    }
}

/// A pull request contributing to a release, with its derived data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePullRequest {
    pub pull_request: PullRequest,
    pub stability: Stability,
    pub changelog: SectionMap,
}

/// The computed next release of one project branch
#[derive(Debug, Clone, PartialEq)]
pub struct NextRelease {
    pub(crate) project: String,
    pub(crate) branch: String,
    pub(crate) current_tag: Tag,
    pub(crate) next_tag: Tag,
    pub(crate) status: CommitState,
    pub(crate) check_runs: Vec<CheckRun>,
    pub(crate) pull_requests: Vec<ReleasePullRequest>,
    pub(crate) changelog: Changelog,
    pub(crate) warnings: Vec<ReleaseWarning>,
}

impl NextRelease {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn current_tag(&self) -> &Tag {
        &self.current_tag
    }

    pub fn next_tag(&self) -> &Tag {
        &self.next_tag
    }

    /// Whether the pull requests since the baseline warrant a new tag
    pub fn is_needed(&self) -> bool {
        self.next_tag != self.current_tag
    }

    /// Strongest stability among the contributing pull requests
    pub fn stability(&self) -> Stability {
        self.pull_requests
            .iter()
            .map(|pr| pr.stability)
            .max()
            .unwrap_or(Stability::Unknown)
    }

    pub fn status(&self) -> CommitState {
        self.status
    }

    pub fn check_runs(&self) -> &[CheckRun] {
        &self.check_runs
    }

    pub fn pull_requests(&self) -> &[ReleasePullRequest] {
        &self.pull_requests
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn warnings(&self) -> &[ReleaseWarning] {
        &self.warnings
    }
}
