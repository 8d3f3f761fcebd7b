use crate::error::{DevkitError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw changelog entries extracted from one pull request, keyed by the
/// section name found in its body (not yet validated).
pub type SectionMap = BTreeMap<String, Vec<String>>;

/// The fixed vocabulary of changelog section headlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Headline {
    Added,
    Changed,
    Deprecated,
    Fixed,
    Removed,
}

impl Headline {
    pub const ALL: [Headline; 5] = [
        Headline::Added,
        Headline::Changed,
        Headline::Deprecated,
        Headline::Fixed,
        Headline::Removed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Headline::Added => "Added",
            Headline::Changed => "Changed",
            Headline::Deprecated => "Deprecated",
            Headline::Fixed => "Fixed",
            Headline::Removed => "Removed",
        }
    }
}

impl FromStr for Headline {
    type Err = DevkitError;

    fn from_str(s: &str) -> Result<Self> {
        Headline::ALL
            .into_iter()
            .find(|headline| headline.as_str() == s)
            .ok_or_else(|| {
                DevkitError::validation(format!(
                    "Changelog section '{}' is not one of Added, Changed, Deprecated, Fixed, Removed",
                    s
                ))
            })
    }
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named group of changelog lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
    headline: Headline,
    lines: Vec<String>,
}

impl ChangelogSection {
    /// Build a section, validating the headline and rejecting blank lines
    pub fn new(headline: &str, lines: Vec<String>) -> Result<Self> {
        let headline = headline.parse::<Headline>()?;

        if lines.iter().any(|line| line.trim().is_empty()) {
            return Err(DevkitError::validation(format!(
                "Changelog section '{}' contains an empty line",
                headline
            )));
        }

        Ok(ChangelogSection { headline, lines })
    }

    pub fn headline(&self) -> Headline {
        self.headline
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A release changelog: a headline plus sections sorted by headline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    headline: String,
    sections: Vec<ChangelogSection>,
}

impl Changelog {
    /// Empty sections are dropped and the rest sorted by headline text.
    pub fn new(headline: impl Into<String>, sections: Vec<ChangelogSection>) -> Self {
        let mut sections: Vec<ChangelogSection> =
            sections.into_iter().filter(|s| !s.is_empty()).collect();
        sections.sort_by(|a, b| a.headline.as_str().cmp(b.headline.as_str()));

        Changelog {
            headline: headline.into(),
            sections,
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn sections(&self) -> &[ChangelogSection] {
        &self.sections
    }

    pub fn section(&self, headline: Headline) -> Option<&ChangelogSection> {
        self.sections.iter().find(|s| s.headline == headline)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render as markdown: headline, blank line, then one `### <section>`
    /// block per section separated by blank lines.
    pub fn as_markdown(&self) -> String {
        let blocks: Vec<String> = self
            .sections
            .iter()
            .map(|section| {
                let mut block = format!("### {}", section.headline);
                for line in &section.lines {
                    block.push('\n');
                    block.push_str(line);
                }
                block
            })
            .collect();

        if blocks.is_empty() {
            return self.headline.clone();
        }

        format!("{}\n\n{}", self.headline, blocks.join("\n\n"))
    }
}
