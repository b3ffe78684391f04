use serde::{Deserialize, Serialize};

use super::{deserialize_id, Platform};

/// A platform code-signing credential stored on the build service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningKey {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub platform: Platform,
    /// Everything else the service reports (certificate expiry, team, ...).
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SigningKey {
    pub fn new(id: &str, platform: Platform) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            platform,
            metadata: serde_json::Map::new(),
        }
    }
}
