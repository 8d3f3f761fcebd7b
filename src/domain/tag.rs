use crate::error::{DevkitError, Result};
use std::fmt;

/// Represents a release tag, either `MAJOR.MINOR.PATCH` or the synthetic
/// `MAJOR.x` placeholder used when a branch has no release yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
}

impl Tag {
    /// Parse a tag from its textual form. The text is kept verbatim.
    pub fn parse(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DevkitError::invalid_format("Tag must not be empty"));
        }

        Ok(Tag {
            name: name.to_string(),
        })
    }

    /// Synthetic baseline for a branch without releases: "4.x" -> "3.x"
    pub fn placeholder_for_next_major(branch_name: &str) -> Result<Self> {
        let major = branch_major(branch_name)?;
        if major == 0 {
            return Err(DevkitError::invalid_format(format!(
                "Branch '{}' has no previous major version",
                branch_name
            )));
        }

        Ok(Tag {
            name: format!("{}.x", major - 1),
        })
    }

    /// Baseline of a branch that was never released. A major-0 branch has
    /// no previous major, so it starts from "0.0.0".
    pub fn initial_baseline(branch_name: &str) -> Result<Self> {
        if branch_major(branch_name)? == 0 {
            return Ok(Tag {
                name: "0.0.0".to_string(),
            });
        }
        Self::placeholder_for_next_major(branch_name)
    }

    pub(crate) fn from_version(version: &semver::Version) -> Self {
        Tag {
            name: version.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Numeric version when the tag is in `MAJOR.MINOR.PATCH` form
    pub fn version(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.name).ok()
    }

    /// Major component when the tag is a `MAJOR.x` placeholder
    pub fn placeholder_major(&self) -> Option<u64> {
        self.name.strip_suffix(".x")?.parse().ok()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Leading numeric component of a branch or tag name ("4.x" -> 4, "3.2" -> 3)
pub fn branch_major(branch_name: &str) -> Result<u64> {
    branch_name
        .split('.')
        .next()
        .and_then(|part| part.parse::<u64>().ok())
        .ok_or_else(|| {
            DevkitError::invalid_format(format!(
                "Branch '{}' does not start with a numeric major version",
                branch_name
            ))
        })
}
