use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Stability;

/// Author of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub html_url: String,
}

/// A merged pull request as read from the repository host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub merged_at: DateTime<Utc>,
    pub html_url: String,
    pub user: User,
}

impl PullRequest {
    pub fn stability(&self) -> Stability {
        Stability::from_labels(&self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pull_request(labels: &[&str]) -> PullRequest {
        PullRequest {
            number: 7,
            title: "Fix the thing".to_string(),
            body: String::new(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            merged_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            html_url: "https://github.com/acme/lib/pull/7".to_string(),
            user: User {
                login: "alice".to_string(),
                html_url: "https://github.com/alice".to_string(),
            },
        }
    }

    #[test]
    fn test_stability_from_labels() {
        assert_eq!(pull_request(&["patch"]).stability(), Stability::Patch);
        assert_eq!(pull_request(&[]).stability(), Stability::Unknown);
    }
}
