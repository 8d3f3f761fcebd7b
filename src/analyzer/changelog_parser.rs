//! Extraction of changelog entries from pull request bodies.
//!
//! A body opts in with a `## Changelog` heading followed by a fenced
//! block:
//!
//! ````text
//! ## Changelog
//!
//! ```markdown
//! ### Fixed
//! - the thing that was broken
//! ```
//! ````
//!
//! Lines starting with `#` open a section; other lines are entries of the
//! current section and are rendered with a link to the pull request and
//! its author.

use regex::Regex;

use crate::domain::{PullRequest, SectionMap};

const COMMENT_PATTERN: &str = r"(?is)<!--.*?-->";
const CHANGELOG_PATTERN: &str = r"(?s)## Changelog.*?```[ \t]*(?i:markdown)[^\n]*\n(.*?)```";

/// Parse the changelog fenced block of a pull request body.
///
/// Returns an empty map when the body carries no changelog block.
pub fn parse_changelog(pull_request: &PullRequest) -> SectionMap {
    let mut sections = SectionMap::new();

    let Some(block) = changelog_block(&pull_request.body) else {
        return sections;
    };

    let mut current: Option<String> = None;

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            current = Some(line.trim_start_matches('#').trim().to_string());
            continue;
        }

        // Lines before the first heading have nowhere to go
        let Some(section) = current.as_ref() else {
            continue;
        };

        // A bare "-" is an empty bullet
        let text = match line.strip_prefix('-') {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => line,
        };
        if text.is_empty() {
            continue;
        }

        sections
            .entry(section.clone())
            .or_default()
            .push(format_entry(pull_request, text));
    }

    sections
}

/// Content of the fenced markdown block under the changelog heading
fn changelog_block(body: &str) -> Option<String> {
    let comments = Regex::new(COMMENT_PATTERN).ok()?;
    let stripped = comments.replace_all(body, "");

    let changelog = Regex::new(CHANGELOG_PATTERN).ok()?;
    let captures = changelog.captures(&stripped)?;

    captures.get(1).map(|m| m.as_str().to_string())
}

fn format_entry(pull_request: &PullRequest, text: &str) -> String {
    format!(
        "- [#{}]({}) {} (@{})({})",
        pull_request.number,
        pull_request.html_url,
        capitalize(text),
        pull_request.user.login,
        pull_request.user.html_url
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
