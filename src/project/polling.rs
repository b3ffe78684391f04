//! Bounded polling until compilations settle.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::snapshot::ProjectSnapshot;
use super::sync::Project;
use crate::error::{SdkError, SdkResult};

/// Polling cadence and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Sleep between refreshes.
    pub interval: Duration,
    /// Total time budget, measured from the start of the call.
    pub max_wait: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(3600),
        }
    }
}

impl PollOptions {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        Self { interval, max_wait }
    }
}

impl Project {
    /// Refresh until no compilation is `Compiling` or `Waiting`.
    ///
    /// `on_tick` runs after every refresh, including the first. Returns the
    /// settled snapshot, or [`SdkError::Timeout`] if the deadline passed
    /// while something was still compiling. Refresh failures end the loop
    /// immediately.
    pub async fn refresh_until_completed<F>(
        &self,
        options: PollOptions,
        mut on_tick: F,
    ) -> SdkResult<Arc<ProjectSnapshot>>
    where
        F: FnMut(&ProjectSnapshot),
    {
        let started = Instant::now();
        // Budgets too large to represent mean "no deadline".
        let deadline = started.checked_add(options.max_wait);

        let mut snapshot = self.refresh().await?;
        on_tick(&snapshot);

        while snapshot.is_compiling() && deadline.map_or(true, |d| Instant::now() < d) {
            debug!(
                project = %self.id(),
                compiling = ?snapshot.compiling_platforms(),
                "Compilations still in progress"
            );
            sleep(options.interval).await;
            snapshot = self.refresh().await?;
            on_tick(&snapshot);
        }

        if snapshot.is_compiling() {
            return Err(SdkError::Timeout {
                waited: started.elapsed(),
                platforms: snapshot.compiling_platforms(),
            });
        }

        info!(project = %self.id(), elapsed = ?started.elapsed(), "Compilations settled");
        Ok(snapshot)
    }

    /// [`Project::refresh_until_completed`] with the session's configured
    /// poll options.
    pub async fn wait_for_compilations<F>(&self, on_tick: F) -> SdkResult<Arc<ProjectSnapshot>>
    where
        F: FnMut(&ProjectSnapshot),
    {
        let options = self.api().session().config().poll;
        self.refresh_until_completed(options, on_tick).await
    }
}
