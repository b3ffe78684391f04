//! Project payload as returned by every project endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    deserialize_id, deserialize_nullable_string, deserialize_timestamp, CompilationData, Platform,
};

/// Where a project's source code comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Zip,
    Url,
    #[serde(alias = "git", alias = "github", alias = "repo")]
    Repository,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Signing key entry nested in a project payload.
///
/// The platform comes from the map key; the service may omit it in the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Full project payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(
        default,
        alias = "bundleID",
        alias = "bundle_identifier",
        deserialize_with = "deserialize_nullable_string"
    )]
    pub bundle_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub version: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub date_compiled: Option<DateTime<Utc>>,
    #[serde(default, alias = "source")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub compilations: HashMap<String, CompilationData>,
    #[serde(default)]
    pub keys: HashMap<String, KeySlot>,
}
