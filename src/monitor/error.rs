use thiserror::Error;

use crate::version::error::RegistryError;

/// Failures that abort a whole poll cycle
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Error fetching remote version: {0}")]
    RemoteVersion(#[from] RegistryError),

    #[error("Invalid {field} version '{value}'")]
    InvalidVersion { field: &'static str, value: String },
}
