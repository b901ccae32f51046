//! Read-only status derived from the latest poll result

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DEFAULT_NAME;
use crate::monitor::cycle::PollResult;
use crate::version::types::ChangeRecord;

/// Status value published to consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub name: &'static str,
    /// Number of potential breaking changes
    pub state: usize,
    /// False until the first successful cycle, and after a failed one
    pub available: bool,
    pub attributes: StatusAttributes,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusAttributes {
    pub changes: Vec<ChangeRecord>,
    pub versions: Vec<String>,
    pub covered: Vec<String>,
}

impl StatusSnapshot {
    pub fn unavailable() -> Self {
        Self {
            name: DEFAULT_NAME,
            state: 0,
            available: false,
            attributes: StatusAttributes::default(),
            last_updated: None,
        }
    }

    pub fn from_result(result: &PollResult, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: DEFAULT_NAME,
            state: result.changes.len(),
            available: true,
            attributes: StatusAttributes {
                changes: result.changes.clone(),
                versions: result.versions.clone(),
                covered: result.covered.iter().cloned().collect(),
            },
            last_updated: Some(updated_at),
        }
    }

    /// Mark the status failed, keeping the last known attributes
    pub fn mark_unavailable(&mut self) {
        self.available = false;
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::unavailable()
    }
}
