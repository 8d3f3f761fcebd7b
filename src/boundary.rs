use std::fmt;

/// Warnings raised while determining a release near the edges of the
/// available data. These are non-fatal issues that should be reported to
/// the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseWarning {
    /// The branch has no release yet; a synthetic baseline was used
    NoBaselineRelease { branch: String, placeholder: String },
    /// Commit status or check runs could not be fetched
    StatusUnavailable { reason: String },
    /// A pull request body used a changelog section outside the fixed set
    UnrecognizedChangelogSection { pull_request: u64, headline: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NoBaselineRelease {
                branch,
                placeholder,
            } => {
                write!(
                    f,
                    "No release found for branch '{}', comparing against '{}'",
                    branch, placeholder
                )
            }
            ReleaseWarning::StatusUnavailable { reason } => {
                write!(f, "Commit status unavailable: {}", reason)
            }
            ReleaseWarning::UnrecognizedChangelogSection {
                pull_request,
                headline,
            } => {
                write!(
                    f,
                    "Ignoring changelog section '{}' in pull request #{}",
                    headline, pull_request
                )
            }
        }
    }
}
