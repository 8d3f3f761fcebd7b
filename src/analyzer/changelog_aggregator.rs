use std::collections::BTreeMap;

use crate::boundary::ReleaseWarning;
use crate::domain::{Changelog, ChangelogSection, Headline, SectionMap};

/// Result of merging the changelogs of several pull requests
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub changelog: Changelog,
    pub warnings: Vec<ReleaseWarning>,
}

/// Merge per-pull-request changelogs into one release changelog.
///
/// `changelogs` yields `(pull request number, parsed sections)` in merge
/// order. Lines of a shared section are concatenated in that order with
/// exact duplicates removed. Sections outside the fixed headline set are
/// dropped with a warning.
pub fn aggregate<'a, I>(headline: &str, changelogs: I) -> Aggregation
where
    I: IntoIterator<Item = (u64, &'a SectionMap)>,
{
    let mut merged: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut warnings = Vec::new();

    for (number, sections) in changelogs {
        for (name, lines) in sections {
            let Ok(section_headline) = name.parse::<Headline>() else {
                tracing::debug!(pull_request = number, section = %name, "dropping changelog section");
                warnings.push(ReleaseWarning::UnrecognizedChangelogSection {
                    pull_request: number,
                    headline: name.clone(),
                });
                continue;
            };

            let target = merged.entry(section_headline.as_str()).or_default();
            for line in lines {
                if !line.trim().is_empty() && !target.contains(line) {
                    target.push(line.clone());
                }
            }
        }
    }

    let sections = merged
        .into_iter()
        .filter(|(_, lines)| !lines.is_empty())
        .filter_map(|(name, lines)| ChangelogSection::new(name, lines).ok())
        .collect();

    Aggregation {
        changelog: Changelog::new(headline, sections),
        warnings,
    }
}
