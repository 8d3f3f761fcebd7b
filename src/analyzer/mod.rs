//! Analysis engine turning merged pull requests into the next release

pub mod changelog_aggregator;
pub mod changelog_parser;
pub mod release_determination;
pub mod version_calculator;

pub use changelog_aggregator::{aggregate, Aggregation};
pub use changelog_parser::parse_changelog;
pub use release_determination::ReleaseDetermination;
pub use version_calculator::compute_next;
