//! Per-platform compilation state.

use serde::{Deserialize, Serialize};

use super::Platform;

/// Status of a platform's remote build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationStatus {
    Queued,
    Waiting,
    Compiling,
    Completed,
    Error,
    Disabled,
    /// A status this SDK version does not know about.
    #[serde(other)]
    Unknown,
}

impl CompilationStatus {
    /// Statuses the polling loop keeps waiting on.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, CompilationStatus::Compiling | CompilationStatus::Waiting)
    }
}

/// Compilation entry as it appears in a project payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationData {
    pub status: CompilationStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "devapp")]
    pub dev_app: bool,
    #[serde(default, alias = "download_link")]
    pub download_url: Option<String>,
}

/// Immutable view of one platform's compilation as of the last refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub platform: Platform,
    pub status: CompilationStatus,
    /// Build error reported by the service, if any.
    pub error: Option<String>,
    /// Whether the last build was a developer app.
    pub dev_app: bool,
    /// Where the artifact can be fetched once completed.
    pub download_url: Option<String>,
}

impl Compilation {
    pub fn from_data(platform: Platform, data: CompilationData) -> Self {
        Self {
            platform,
            status: data.status,
            error: data.error.filter(|e| !e.is_empty()),
            dev_app: data.dev_app,
            download_url: data.download_url,
        }
    }

    pub fn is_compiling(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn is_ready(&self) -> bool {
        self.status == CompilationStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == CompilationStatus::Error
    }
}
