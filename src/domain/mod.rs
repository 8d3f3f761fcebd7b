//! Domain logic - pure value types independent of the repository host

pub mod changelog;
pub mod pull_request;
pub mod release;
pub mod stability;
pub mod tag;

pub use changelog::{Changelog, ChangelogSection, Headline, SectionMap};
pub use pull_request::{PullRequest, User};
pub use release::{CheckRun, CommitState, NextRelease, Release, ReleasePullRequest};
pub use stability::Stability;
pub use tag::{branch_major, Tag};
