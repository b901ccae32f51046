//! Platform release identifiers
//!
//! Releases follow PEP 440 (`2024.11.3`, `2025.2.0b1`). The first release
//! segment is treated as the major (the year) and the second as the minor.

use std::str::FromStr;

use pep508_rs::pep440_rs::Version;
use tracing::warn;

/// Parse a release string, returning None if it is not a valid PEP 440 version.
pub fn parse_version(version: &str) -> Option<Version> {
    Version::from_str(version.trim())
        .inspect_err(|e| warn!("Failed to parse version '{}': {}", version, e))
        .ok()
}

/// Returns `(major, minor)` of a release. A missing minor counts as 0.
pub fn major_minor(version: &Version) -> (u64, u64) {
    let release = version.release();
    (
        release.first().copied().unwrap_or(0),
        release.get(1).copied().unwrap_or(0),
    )
}

/// Build the `major.minor` identifier of a feature release.
pub fn feature_release(major: u64, minor: u64) -> Version {
    Version::new([major, minor])
}
