//! HTTP fixtures for the release and breaking changes endpoints

use mockito::{Mock, ServerGuard};
use reqwest::Client;

use breaking_changes::version::registries::{ChangesApiRegistry, PypiReleaseRegistry};

pub const RELEASE_PATH: &str = "/pypi/homeassistant/json";

/// Registries pointed at a mock server
pub fn create_registries(server: &ServerGuard) -> (PypiReleaseRegistry, ChangesApiRegistry) {
    let client = Client::new();
    let releases = PypiReleaseRegistry::new(
        client.clone(),
        &format!("{}{}", server.url(), RELEASE_PATH),
    );
    let changes = ChangesApiRegistry::new(client, &format!("{}/v1/{{version}}", server.url()));
    (releases, changes)
}

pub async fn mock_latest_release(server: &mut ServerGuard, version: &str) -> Mock {
    server
        .mock("GET", RELEASE_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"info": {{"version": "{}"}}}}"#, version))
        .create_async()
        .await
}

pub async fn mock_changes(server: &mut ServerGuard, version: &str, body: &str) -> Mock {
    server
        .mock("GET", format!("/v1/{}", version).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_status(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .create_async()
        .await
}
