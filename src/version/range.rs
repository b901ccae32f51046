//! Resolves the feature releases lying between two platform versions

use pep508_rs::pep440_rs::Version;

use crate::config::MINORS_PER_MAJOR;
use crate::version::release::{feature_release, major_minor};

/// Compute the feature releases to query when upgrading from `current` to `remote`.
///
/// Releases are returned oldest first. Every release after `current`'s minor up to
/// and including `remote`'s minor is listed, assuming [`MINORS_PER_MAJOR`] minors
/// per major. Releases below `minimum` are dropped.
///
/// Majors between the two are not enumerated. Returns an empty list if `current`
/// is not older than `remote`, and None if `remote` has a minor above
/// [`MINORS_PER_MAJOR`], so at most `2 * MINORS_PER_MAJOR` releases are returned.
pub fn versions_between(
    current: &Version,
    remote: &Version,
    minimum: &Version,
) -> Option<Vec<Version>> {
    if current >= remote {
        return Some(Vec::new());
    }

    let (current_major, current_minor) = major_minor(current);
    let (remote_major, remote_minor) = major_minor(remote);

    if remote_minor > MINORS_PER_MAJOR {
        return None;
    }

    let mut versions = Vec::new();

    if current_major < remote_major {
        versions.extend(
            (current_minor + 1..=MINORS_PER_MAJOR).map(|minor| feature_release(current_major, minor)),
        );
        versions.extend((1..=remote_minor).map(|minor| feature_release(remote_major, minor)));
    } else {
        versions.extend(
            (current_minor + 1..=remote_minor).map(|minor| feature_release(remote_major, minor)),
        );
    }

    versions.retain(|version| version >= minimum);
    Some(versions)
}
