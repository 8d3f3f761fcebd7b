//! Repository host abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only queries
//! release determination needs from the repository host, allowing for a
//! real GitHub implementation and an in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [RepositoryHost] trait. The concrete
//! implementations include:
//!
//! - [github::GitHubHost]: REST client for the GitHub API using `reqwest`
//! - [mock::MockHost]: In-memory implementation for testing
//!
//! # Usage
//!
//! Code should depend on the [RepositoryHost] trait rather than concrete
//! implementations.
//!
//! ```rust
//! # use release_devkit::host::{RepoRef, RepositoryHost};
//! # fn example<H: RepositoryHost>(host: &H) -> release_devkit::Result<()> {
//! let repo = RepoRef::new("sonata-project", "admin-bundle");
//! let release = host.latest_release(&repo, "4.x")?;
//! let pull_requests = host.merged_pull_requests(
//!     &repo,
//!     "4.x",
//!     release.map(|r| r.published_at),
//!     "SonataCI",
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;

pub use github::GitHubHost;
pub use mock::MockHost;

use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::{CheckRun, CommitState, PullRequest, Release};
use crate::error::Result;

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoRef {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Read-only queries against a repository host
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` so a single host can serve a batch
/// of projects computed in parallel.
///
/// ## Error Handling
///
/// Transport and authentication failures are returned as
/// [crate::error::DevkitError] values and propagated unchanged by callers.
/// Routine absences (no release yet) are `Ok(None)`, not errors.
pub trait RepositoryHost: Send + Sync {
    /// Latest published release of a branch
    ///
    /// Returns the newest non-draft release whose tag shares the branch's
    /// major version.
    ///
    /// # Returns
    /// * `Ok(Some(Release))` - The latest release
    /// * `Ok(None)` - If the branch was never released
    /// * `Err` - On transport or authentication failure
    fn latest_release(&self, repo: &RepoRef, branch: &str) -> Result<Option<Release>>;

    /// Pull requests merged into a branch
    ///
    /// # Arguments
    /// * `since` - Only pull requests merged after this instant; `None` for all
    /// * `exclude_author` - Login whose pull requests are left out (the bot)
    ///
    /// # Returns
    /// * `Ok(Vec<PullRequest>)` - Ordered by merge time, oldest first
    fn merged_pull_requests(
        &self,
        repo: &RepoRef,
        branch: &str,
        since: Option<DateTime<Utc>>,
        exclude_author: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Sha of the commit at the tip of a branch
    fn branch_head(&self, repo: &RepoRef, branch: &str) -> Result<String>;

    /// Combined commit status of a sha
    fn combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CommitState>;

    /// Check runs reported for a sha
    fn check_runs(&self, repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>>;
}
