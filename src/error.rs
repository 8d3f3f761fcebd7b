use chrono::{DateTime, Utc};
use thiserror::Error;

/// Unified error type for devkit operations
#[derive(Error, Debug)]
pub enum DevkitError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{}", no_pull_requests_message(.project, .branch, .since))]
    NoPullRequestsMergedSinceLastRelease {
        project: String,
        branch: String,
        since: Option<DateTime<Utc>>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository host returned {status}: {message}")]
    Host { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in devkit
pub type Result<T> = std::result::Result<T, DevkitError>;

fn no_pull_requests_message(
    project: &str,
    branch: &str,
    since: &Option<DateTime<Utc>>,
) -> String {
    match since {
        Some(date) => format!(
            "No pull requests merged since {} on {} branch {}",
            date.format("%Y-%m-%d %H:%M:%S"),
            project,
            branch
        ),
        None => format!("No pull requests merged on {} branch {}", project, branch),
    }
}

impl DevkitError {
    /// Create an invalid-format error with context
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        DevkitError::InvalidFormat(msg.into())
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        DevkitError::Validation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DevkitError::Config(msg.into())
    }

    /// Create a host error from a response status and body
    pub fn host(status: u16, msg: impl Into<String>) -> Self {
        DevkitError::Host {
            status,
            message: msg.into(),
        }
    }

    /// True for the expected "nothing to release" outcome, which batch
    /// callers skip instead of reporting as a failure.
    pub fn is_terminal_skip(&self) -> bool {
        matches!(
            self,
            DevkitError::NoPullRequestsMergedSinceLastRelease { .. }
        )
    }
}
