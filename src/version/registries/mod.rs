//! Registry implementations for fetching release and breaking change data

use std::time::Duration;

use reqwest::Client;

use crate::config::APP_NAME;

pub mod changes;
pub mod pypi;

pub use changes::ChangesApiRegistry;
pub use pypi::PypiReleaseRegistry;

/// Build the HTTP client shared by the registries.
///
/// Every request made with it is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(APP_NAME)
        .timeout(timeout)
        .build()
}
