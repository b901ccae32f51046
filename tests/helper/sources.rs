//! In-memory sources for driving the monitor without a network

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use breaking_changes::version::error::RegistryError;
use breaking_changes::version::registry::{ChangeSource, ReleaseSource};
use breaking_changes::version::types::RemoteChange;

/// Release source returning a scripted sequence of latest versions
///
/// `None` entries simulate an unavailable endpoint. The last entry repeats.
pub struct ScriptedReleases {
    responses: Mutex<Vec<Option<String>>>,
}

impl ScriptedReleases {
    pub fn new(responses: Vec<Option<&str>>) -> Self {
        let mut responses: Vec<_> = responses
            .into_iter()
            .map(|response| response.map(str::to_string))
            .collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl ReleaseSource for ScriptedReleases {
    async fn fetch_latest_version(&self) -> Result<String, RegistryError> {
        let mut responses = self.responses.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.pop().flatten()
        } else {
            responses.last().cloned().flatten()
        };
        response.ok_or_else(|| RegistryError::InvalidResponse("status 503".to_string()))
    }
}

/// Change source backed by a map of release to entries
#[derive(Default)]
pub struct StaticChanges {
    changes: HashMap<String, Vec<RemoteChange>>,
}

impl StaticChanges {
    pub fn with_change(mut self, version: &str, integration: &str, title: &str) -> Self {
        self.changes
            .entry(version.to_string())
            .or_default()
            .push(RemoteChange {
                title: Some(title.to_string()),
                integration: Some(integration.to_string()),
                description: None,
            });
        self
    }
}

#[async_trait]
impl ChangeSource for StaticChanges {
    async fn fetch_changes(&self, version: &str) -> Result<Vec<RemoteChange>, RegistryError> {
        self.changes
            .get(version)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(version.to_string()))
    }
}
