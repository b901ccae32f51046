//! One poll cycle: resolve the latest release, query every release in between,
//! and keep the changes that affect active components

use std::collections::BTreeSet;

use pep508_rs::pep440_rs::Version;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::monitor::components::ActiveComponents;
use crate::monitor::error::CycleError;
use crate::version::error::RegistryError;
use crate::version::range::versions_between;
use crate::version::registry::{ChangeSource, ReleaseSource};
use crate::version::release::parse_version;
use crate::version::types::ChangeRecord;

/// Result of the latest poll cycle
///
/// `versions` and `covered` list exactly the releases queried by the cycle,
/// whether or not they yielded changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    pub changes: Vec<ChangeRecord>,
    pub versions: Vec<String>,
    pub covered: BTreeSet<String>,
}

impl PollResult {
    fn record(&mut self, version: String, changes: Vec<ChangeRecord>) {
        self.changes.extend(changes);
        self.covered.insert(version.clone());
        self.versions.push(version);
    }
}

/// Everything a poll cycle depends on
pub struct CycleContext<'a> {
    pub current_version: &'a Version,
    pub minimum_version: &'a Version,
    pub components: &'a ActiveComponents,
    pub releases: &'a dyn ReleaseSource,
    pub changes: &'a dyn ChangeSource,
}

/// Run a single poll cycle
///
/// Failing to resolve the latest release aborts the cycle. Failures for a single
/// release only mean that release contributes no changes.
pub async fn run_cycle(ctx: &CycleContext<'_>) -> Result<PollResult, CycleError> {
    let remote_version = fetch_remote_version(ctx.releases).await?;

    if ctx.current_version >= &remote_version {
        debug!(
            "Current version {} >= remote version {}, skipping",
            ctx.current_version, remote_version
        );
        return Ok(PollResult::default());
    }

    debug!(
        "Loaded integrations: {:?}",
        ctx.components.iter().collect::<Vec<_>>()
    );

    let Some(request_versions) =
        versions_between(ctx.current_version, &remote_version, ctx.minimum_version)
    else {
        return Err(CycleError::InvalidVersion {
            field: "remote",
            value: remote_version.to_string(),
        });
    };

    if request_versions.is_empty() {
        debug!("No valid versions to check");
        return Ok(PollResult::default());
    }

    let mut result = PollResult::default();
    for version in request_versions {
        let version = version.to_string();
        let changes = fetch_relevant_changes(ctx.changes, &version, ctx.components).await;
        result.record(version, changes);
    }

    info!(
        "Found {} potential breaking changes across {} releases ({} -> {})",
        result.changes.len(),
        result.versions.len(),
        ctx.current_version,
        remote_version
    );

    Ok(result)
}

async fn fetch_remote_version(source: &dyn ReleaseSource) -> Result<Version, CycleError> {
    let version = source.fetch_latest_version().await?;
    parse_version(&version).ok_or(CycleError::InvalidVersion {
        field: "remote",
        value: version,
    })
}

/// Fetch the changes of one release that affect an active component
///
/// Any failure is logged and yields no changes.
pub async fn fetch_relevant_changes(
    source: &dyn ChangeSource,
    version: &str,
    components: &ActiveComponents,
) -> Vec<ChangeRecord> {
    let changes = match source.fetch_changes(version).await {
        Ok(changes) => changes,
        Err(RegistryError::NotFound(_)) => {
            debug!("No breaking changes published for {}", version);
            return Vec::new();
        }
        Err(RegistryError::InvalidResponse(reason)) => {
            debug!("No breaking changes for {} ({})", version, reason);
            return Vec::new();
        }
        Err(e) => {
            error!("Error fetching breaking changes for {}: {}", version, e);
            return Vec::new();
        }
    };

    changes
        .into_iter()
        .filter(|change| {
            change
                .integration
                .as_deref()
                .is_some_and(|integration| components.contains(integration))
        })
        .filter_map(|change| change.into_record())
        .collect()
}
