//! GitHub implementation of [RepositoryHost]
//!
//! Uses the GitHub REST API v3 with a blocking `reqwest` client.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::header;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{branch_major, CheckRun, CommitState, PullRequest, Release, Tag, User};
use crate::error::{DevkitError, Result};
use crate::host::{RepoRef, RepositoryHost};

/// GitHub API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;

/// Releases are listed newest first; older pages rarely hold the branch's latest
const MAX_RELEASE_PAGES: u32 = 5;

/// The search API stops at 1000 results
const MAX_SEARCH_PAGES: u32 = 10;

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    html_url: String,
    user: GitHubUser,
    pull_request: Option<SearchPullRequest>,
}

#[derive(Debug, Deserialize)]
struct SearchPullRequest {
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubBranch {
    commit: GitHubCommit,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubStatus {
    state: String,
}

#[derive(Debug, Deserialize)]
struct CheckRunsResponse {
    check_runs: Vec<GitHubCheckRun>,
}

#[derive(Debug, Deserialize)]
struct GitHubCheckRun {
    name: String,
    status: String,
    conclusion: Option<String>,
}

impl SearchItem {
    fn into_pull_request(self) -> Option<PullRequest> {
        let merged_at = self.pull_request?.merged_at?;

        Some(PullRequest {
            number: self.number,
            title: self.title,
            body: self.body.unwrap_or_default(),
            labels: self.labels.into_iter().map(|label| label.name).collect(),
            merged_at,
            html_url: self.html_url,
            user: User {
                login: self.user.login,
                html_url: self.user.html_url,
            },
        })
    }
}

/// Repository host backed by the GitHub REST API
pub struct GitHubHost {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubHost {
    /// Create a client for api.github.com
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_api_url(token, GITHUB_API_URL)
    }

    /// Create a client for a custom API URL (GitHub Enterprise, tests)
    pub fn with_api_url(token: Option<String>, api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("release-devkit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if token.is_none() {
            tracing::warn!("no GitHub token configured, requests are unauthenticated");
        }

        Ok(GitHubHost {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// GET a JSON resource. A 404 is `Ok(None)`; other non-2xx statuses are
    /// returned as [DevkitError::Host].
    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(%url, ?query, "GitHub request");

        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .query(query);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DevkitError::host(status.as_u16(), body));
        }

        Ok(Some(response.json::<T>()?))
    }

    fn get_required<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.get(path, query)?
            .ok_or_else(|| DevkitError::host(404, format!("Not found: {}", path)))
    }
}

/// Search query for merged pull requests of a branch
fn merged_search_query(
    repo: &RepoRef,
    branch: &str,
    since: Option<DateTime<Utc>>,
    exclude_author: &str,
) -> String {
    let mut query = format!(
        "repo:{} is:pr is:merged base:{} -author:{}",
        repo, branch, exclude_author
    );

    if let Some(date) = since {
        query.push_str(&format!(
            " merged:>{}",
            date.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }

    query
}

impl RepositoryHost for GitHubHost {
    fn latest_release(&self, repo: &RepoRef, branch: &str) -> Result<Option<Release>> {
        let major = branch_major(branch)?;
        let path = format!("/repos/{}/{}/releases", repo.owner, repo.name);

        for page in 1..=MAX_RELEASE_PAGES {
            let releases: Vec<GitHubRelease> = self
                .get(
                    &path,
                    &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
                )?
                .unwrap_or_default();

            let found = releases.iter().find_map(|release| {
                if release.draft || release.prerelease {
                    return None;
                }
                if branch_major(&release.tag_name).ok() != Some(major) {
                    return None;
                }
                Some(Release {
                    tag: Tag::parse(&release.tag_name).ok()?,
                    published_at: release.published_at?,
                })
            });

            if found.is_some() {
                return Ok(found);
            }

            if releases.len() < PER_PAGE as usize {
                break;
            }
        }

        Ok(None)
    }

    fn merged_pull_requests(
        &self,
        repo: &RepoRef,
        branch: &str,
        since: Option<DateTime<Utc>>,
        exclude_author: &str,
    ) -> Result<Vec<PullRequest>> {
        let query = merged_search_query(repo, branch, since, exclude_author);
        let mut pull_requests = Vec::new();

        for page in 1..=MAX_SEARCH_PAGES {
            let response: SearchResponse = self.get_required(
                "/search/issues",
                &[
                    ("q", query.clone()),
                    ("sort", "created".to_string()),
                    ("order", "asc".to_string()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;

            let count = response.items.len();
            pull_requests.extend(
                response
                    .items
                    .into_iter()
                    .filter_map(SearchItem::into_pull_request),
            );

            if count < PER_PAGE as usize
                || (page as u64) * (PER_PAGE as u64) >= response.total_count
            {
                break;
            }
        }

        pull_requests.retain(|pr| {
            pr.user.login != exclude_author && since.map_or(true, |date| pr.merged_at > date)
        });
        pull_requests.sort_by_key(|pr| pr.merged_at);

        tracing::debug!(
            repository = %repo,
            branch,
            count = pull_requests.len(),
            "fetched merged pull requests"
        );

        Ok(pull_requests)
    }

    fn branch_head(&self, repo: &RepoRef, branch: &str) -> Result<String> {
        let branch: GitHubBranch = self.get_required(
            &format!("/repos/{}/{}/branches/{}", repo.owner, repo.name, branch),
            &[],
        )?;
        Ok(branch.commit.sha)
    }

    fn combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CommitState> {
        let status: GitHubStatus = self.get_required(
            &format!("/repos/{}/{}/commits/{}/status", repo.owner, repo.name, sha),
            &[],
        )?;
        Ok(CommitState::from_status(&status.state))
    }

    fn check_runs(&self, repo: &RepoRef, sha: &str) -> Result<Vec<CheckRun>> {
        let response: CheckRunsResponse = self.get_required(
            &format!(
                "/repos/{}/{}/commits/{}/check-runs",
                repo.owner, repo.name, sha
            ),
            &[("per_page", PER_PAGE.to_string())],
        )?;

        Ok(response
            .check_runs
            .into_iter()
            .map(|run| CheckRun {
                name: run.name,
                status: run.status,
                conclusion: run.conclusion,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_search_query_without_date() {
        let repo = RepoRef::new("sonata-project", "admin-bundle");
        assert_eq!(
            merged_search_query(&repo, "4.x", None, "SonataCI"),
            "repo:sonata-project/admin-bundle is:pr is:merged base:4.x -author:SonataCI"
        );
    }

    #[test]
    fn test_search_query_with_date() {
        let repo = RepoRef::new("sonata-project", "admin-bundle");
        let since = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        assert!(merged_search_query(&repo, "4.x", Some(since), "SonataCI")
            .ends_with(" merged:>2024-02-03T04:05:06Z"));
    }

    #[test]
    fn test_search_item_conversion() {
        let json = r#"{
            "number": 42,
            "title": "Fix a thing",
            "body": null,
            "labels": [{"name": "patch"}],
            "html_url": "https://github.com/acme/lib/pull/42",
            "user": {"login": "alice", "html_url": "https://github.com/alice"},
            "pull_request": {"merged_at": "2024-01-05T10:00:00Z"}
        }"#;

        let item: SearchItem = serde_json::from_str(json).unwrap();
        let pr = item.into_pull_request().unwrap();

        assert_eq!(pr.number, 42);
        assert_eq!(pr.body, "");
        assert_eq!(pr.labels, vec!["patch".to_string()]);
        assert_eq!(pr.user.login, "alice");
    }

    #[test]
    fn test_unmerged_search_item_is_skipped() {
        let json = r#"{
            "number": 7,
            "title": "Open",
            "body": "",
            "labels": [],
            "html_url": "https://github.com/acme/lib/pull/7",
            "user": {"login": "bob", "html_url": "https://github.com/bob"},
            "pull_request": {"merged_at": null}
        }"#;

        let item: SearchItem = serde_json::from_str(json).unwrap();
        assert!(item.into_pull_request().is_none());
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let host = GitHubHost::with_api_url(None, "https://github.example.com/api/v3/").unwrap();
        assert_eq!(host.api_url, "https://github.example.com/api/v3");
    }
}
