use crate::domain::{Stability, Tag};
use crate::error::{DevkitError, Result};

/// Compute the next tag from the current one and the stabilities of the
/// pull requests merged since.
///
/// - no pull requests, or only pedantic/unknown ones: unchanged
/// - any minor: minor + 1, patch reset
/// - otherwise any patch: patch + 1
///
/// A `N.x` placeholder baseline moves to `N+1.0.0` on any bump, since the
/// branch has never been released.
pub fn compute_next(current: &Tag, stabilities: &[Stability]) -> Result<Tag> {
    let strongest = stabilities.iter().copied().max();

    let bump_minor = match strongest {
        Some(Stability::Minor) => true,
        Some(Stability::Patch) => false,
        Some(Stability::Pedantic | Stability::Unknown) | None => return Ok(current.clone()),
    };

    if let Some(major) = current.placeholder_major() {
        return Ok(Tag::from_version(&semver::Version::new(major + 1, 0, 0)));
    }

    let version = current.version().ok_or_else(|| {
        DevkitError::invalid_format(format!(
            "Cannot bump tag '{}': expected MAJOR.MINOR.PATCH",
            current
        ))
    })?;

    let next = if bump_minor {
        semver::Version::new(version.major, version.minor + 1, 0)
    } else {
        semver::Version::new(version.major, version.minor, version.patch + 1)
    };

    Ok(Tag::from_version(&next))
}
