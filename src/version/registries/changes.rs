//! Breaking changes API client

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::version::error::RegistryError;
use crate::version::registry::ChangeSource;
use crate::version::types::RemoteChange;

const VERSION_PLACEHOLDER: &str = "{version}";

/// Registry serving the breaking changes of each feature release
pub struct ChangesApiRegistry {
    client: Client,
    url_template: String,
}

impl ChangesApiRegistry {
    /// Creates a registry for `url_template`, in which `{version}` is replaced
    /// by the requested release
    pub fn new(client: Client, url_template: &str) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }

    fn url_for(&self, version: &str) -> String {
        self.url_template.replace(VERSION_PLACEHOLDER, version)
    }
}

#[async_trait]
impl ChangeSource for ChangesApiRegistry {
    async fn fetch_changes(&self, version: &str) -> Result<Vec<RemoteChange>, RegistryError> {
        let url = self.url_for(version);
        debug!("Checking breaking changes for {} ({})", version, url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(version.to_string()));
        }

        if !response.status().is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "Breaking changes API returned status {}",
                response.status()
            )));
        }

        // `null` is served for releases without entries
        let changes: Option<Vec<RemoteChange>> = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        Ok(changes.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHANGES_URL;
    use mockito::Server;

    fn registry(base_url: String) -> ChangesApiRegistry {
        ChangesApiRegistry::new(Client::new(), &format!("{}/v1/{{version}}", base_url))
    }

    #[test]
    fn url_for_substitutes_version() {
        let registry = ChangesApiRegistry::new(Client::new(), DEFAULT_CHANGES_URL);

        assert_eq!(
            registry.url_for("2024.4"),
            "https://hachanges.entrypoint.xyz/v1/2024.4"
        );
    }

    #[tokio::test]
    async fn fetch_changes_returns_all_entries() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/2024.4")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"title": "YAML removed", "integration": "hue", "description": "Use the UI"},
                    {"title": "Renamed entity", "integration": "zha"},
                    {"title": "General", "description": "No integration"}
                ]"#,
            )
            .create_async()
            .await;

        let registry = registry(server.url());
        let result = registry.fetch_changes("2024.4").await.unwrap();

        mock.assert_async().await;

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].integration.as_deref(), Some("hue"));
        assert_eq!(result[1].description, None);
        assert_eq!(result[2].integration, None);
    }

    #[tokio::test]
    async fn fetch_changes_treats_null_body_as_empty() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/2024.5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("null")
            .create_async()
            .await;

        let registry = registry(server.url());
        let result = registry.fetch_changes("2024.5").await.unwrap();

        mock.assert_async().await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_changes_returns_not_found_for_unpublished_release() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/2099.1")
            .with_status(404)
            .create_async()
            .await;

        let registry = registry(server.url());
        let result = registry.fetch_changes("2099.1").await;

        mock.assert_async().await;

        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_changes_rejects_malformed_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/2024.6")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": "object"}"#)
            .create_async()
            .await;

        let registry = registry(server.url());
        let result = registry.fetch_changes("2024.6").await;

        mock.assert_async().await;

        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
