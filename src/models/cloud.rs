use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{deserialize_id, Platform};

/// A starter project the service can create new projects from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "url")]
    pub source_url: Option<String>,
}

/// Toolchain versions the service supports, keyed by platform name.
///
/// Kept as raw strings so that platforms this SDK does not know about
/// still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformVersions(pub BTreeMap<String, Vec<String>>);

impl PlatformVersions {
    pub fn get(&self, platform: Platform) -> &[String] {
        self.0
            .get(platform.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Newest version, assuming the service lists them in ascending order.
    pub fn latest(&self, platform: Platform) -> Option<&str> {
        self.get(platform).last().map(String::as_str)
    }
}
