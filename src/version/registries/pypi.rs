//! PyPI client for resolving the latest published platform release

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::version::error::RegistryError;
use crate::version::registry::ReleaseSource;

/// PyPI release registry
pub struct PypiReleaseRegistry {
    client: Client,
    url: String,
}

impl PypiReleaseRegistry {
    /// Creates a registry reading the package JSON document at `url`
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: Option<PypiInfo>,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    /// Latest version (according to PyPI)
    version: Option<String>,
}

#[async_trait]
impl ReleaseSource for PypiReleaseRegistry {
    async fn fetch_latest_version(&self) -> Result<String, RegistryError> {
        debug!("Fetching latest release: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(self.url.clone()));
        }

        if !response.status().is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "PyPI API returned status {}",
                response.status()
            )));
        }

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        let version = pypi_response
            .info
            .and_then(|info| info.version)
            .map(|version| version.trim().to_string())
            .filter(|version| !version.is_empty())
            .ok_or_else(|| {
                RegistryError::InvalidResponse("response has no info.version".to_string())
            })?;

        debug!("Latest release is {}", version);

        Ok(version)
    }
}
