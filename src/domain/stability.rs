use std::fmt;

/// Impact of a pull request on the next version, derived from its labels.
///
/// Variants are ordered by strength so the strongest stability of a set
/// of pull requests is simply its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Unknown,
    Pedantic,
    Patch,
    Minor,
}

/// Label name to stability, checked in order; the first match wins.
const LABEL_TABLE: &[(&str, Stability)] = &[
    ("minor", Stability::Minor),
    ("patch", Stability::Patch),
    ("docs", Stability::Pedantic),
    ("pedantic", Stability::Pedantic),
];

impl Stability {
    /// Classify a pull request from its label names
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<S> = labels.into_iter().collect();

        LABEL_TABLE
            .iter()
            .find(|(name, _)| labels.iter().any(|label| label.as_ref() == *name))
            .map(|(_, stability)| *stability)
            .unwrap_or(Stability::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Minor => "minor",
            Stability::Patch => "patch",
            Stability::Pedantic => "pedantic",
            Stability::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
