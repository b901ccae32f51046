//! Breaking change records

use serde::{Deserialize, Serialize};

/// A change entry as returned by the breaking changes service
///
/// Every field is optional on the wire; entries without an integration are
/// never relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteChange {
    pub title: Option<String>,
    pub integration: Option<String>,
    pub description: Option<String>,
}

/// A breaking change affecting an active component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub title: Option<String>,
    pub integration: String,
    pub description: Option<String>,
}

impl RemoteChange {
    /// Convert into a record if the entry names an integration
    pub fn into_record(self) -> Option<ChangeRecord> {
        let integration = self.integration?;
        Some(ChangeRecord {
            title: self.title,
            integration,
            description: self.description,
        })
    }
}
