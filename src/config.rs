use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default refresh interval in seconds (5 minutes)
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 5 * 60;

/// Timeout for each HTTP request in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// Release constants
// =============================================================================

/// Oldest release for which breaking change data is published
pub const MINIMUM_VERSION: &str = "2021.3";

/// Number of minor releases per major (one per month).
///
/// Known limitation: the range resolver assumes every major has exactly this
/// many minors.
pub const MINORS_PER_MAJOR: u64 = 12;

/// Endpoint returning the latest published platform release
pub const DEFAULT_RELEASE_URL: &str = "https://pypi.org/pypi/homeassistant/json";

/// Endpoint template for per-release breaking changes, `{version}` is substituted
pub const DEFAULT_CHANGES_URL: &str = "https://hachanges.entrypoint.xyz/v1/{version}";

/// Display name of the published status
pub const DEFAULT_NAME: &str = "Potential breaking changes";

pub const APP_NAME: &str = "breaking-changes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("The running platform version is not configured")]
    MissingCurrentVersion,

    #[error("Invalid {field}: '{value}'")]
    InvalidVersion { field: &'static str, value: String },
}

/// Monitor configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Version of the platform currently running
    pub current_version: Option<String>,
    /// Loaded components, e.g. `["hue", "hue.light", "mqtt"]`
    pub components: Vec<String>,
    /// Refresh interval in seconds
    pub scan_interval: u64,
    /// Per-request timeout in seconds
    pub fetch_timeout: u64,
    pub minimum_version: String,
    pub endpoints: EndpointsConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            current_version: None,
            components: Vec::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
            fetch_timeout: FETCH_TIMEOUT_SECS,
            minimum_version: MINIMUM_VERSION.to_string(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointsConfig {
    pub release_url: String,
    pub changes_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            release_url: DEFAULT_RELEASE_URL.to_string(),
            changes_url: DEFAULT_CHANGES_URL.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout.max(1))
    }
}

/// Directory holding the result store and the log files.
///
/// Lives under the XDG data home, then `~/.local/share`, then the working directory.
pub fn data_dir() -> PathBuf {
    app_dir_under(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

pub fn db_path() -> PathBuf {
    data_dir().join("last_result.db")
}

fn app_dir_under(xdg_data_home: Option<String>, home: Option<PathBuf>) -> PathBuf {
    let root = match (xdg_data_home, home) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => home.join(".local").join("share"),
        (None, None) => PathBuf::from("."),
    };
    root.join(APP_NAME)
}
