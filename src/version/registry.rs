//! Source traits for remote release and breaking change data

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::RemoteChange;

/// Trait for resolving the latest published platform release
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches the latest published release string (e.g. "2025.2.4")
    async fn fetch_latest_version(&self) -> Result<String, RegistryError>;
}

/// Trait for fetching the breaking changes announced for one release
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ChangeSource: Send + Sync {
    /// Fetches every change entry published for a release
    ///
    /// # Arguments
    /// * `version` - The feature release identifier (e.g. "2024.4")
    ///
    /// # Returns
    /// * `Ok(Vec<RemoteChange>)` - All entries, unfiltered
    /// * `Err(RegistryError)` - If the release has no data or the fetch fails
    async fn fetch_changes(&self, version: &str) -> Result<Vec<RemoteChange>, RegistryError>;
}
