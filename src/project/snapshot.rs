//! Immutable view of a project as of one refresh.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{
    Compilation, KeySlot, Origin, Platform, ProjectData, SigningKey,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSnapshot {
    pub id: String,
    pub name: String,
    pub bundle_id: String,
    pub version: String,
    pub origin: Origin,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    pub date_compiled: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
    pub errors: Vec<String>,
    /// Targeted platforms only; an absent key means "not targeted".
    pub compilations: BTreeMap<Platform, Compilation>,
    pub signing_keys: BTreeMap<Platform, SigningKey>,
}

impl ProjectSnapshot {
    /// Build a snapshot from a payload. Entries for unknown platforms are
    /// dropped with a warning.
    pub fn from_data(data: ProjectData) -> Self {
        let mut compilations = BTreeMap::new();
        for (key, compilation) in data.compilations {
            match key.parse::<Platform>() {
                Ok(platform) => {
                    compilations.insert(platform, Compilation::from_data(platform, compilation));
                }
                Err(e) => warn!(project = %data.id, "Skipping compilation: {}", e),
            }
        }

        let mut signing_keys = BTreeMap::new();
        for (key, slot) in data.keys {
            match key.parse::<Platform>() {
                Ok(platform) => {
                    signing_keys.insert(platform, signing_key(platform, slot));
                }
                Err(e) => warn!(project = %data.id, "Skipping signing key: {}", e),
            }
        }

        Self {
            id: data.id,
            name: data.name,
            bundle_id: data.bundle_id,
            version: data.version,
            origin: data.origin,
            date_created: data.date_created,
            date_updated: data.date_updated,
            date_compiled: data.date_compiled,
            source_url: data.source_url,
            errors: data.errors,
            compilations,
            signing_keys,
        }
    }

    /// True iff some compilation is `Compiling` or `Waiting`.
    pub fn is_compiling(&self) -> bool {
        self.compilations.values().any(Compilation::is_compiling)
    }

    pub fn compiling_platforms(&self) -> Vec<Platform> {
        self.compilations
            .values()
            .filter(|c| c.is_compiling())
            .map(|c| c.platform)
            .collect()
    }

    pub fn compilation(&self, platform: Platform) -> Option<&Compilation> {
        self.compilations.get(&platform)
    }

    pub fn signing_key(&self, platform: Platform) -> Option<&SigningKey> {
        self.signing_keys.get(&platform)
    }
}

fn signing_key(platform: Platform, slot: KeySlot) -> SigningKey {
    if slot.platform.is_some_and(|p| p != platform) {
        warn!(key = %slot.id, slot = %platform, "Signing key platform does not match its slot");
    }
    SigningKey {
        id: slot.id,
        name: slot.name,
        platform,
        metadata: slot.metadata,
    }
}
