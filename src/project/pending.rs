use std::future::Future;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::{SdkError, SdkResult};

/// Background configuration-document write started by a property setter.
///
/// Await [`PendingWrite::wait`] to observe the outcome; dropping the handle
/// lets the write finish on its own.
#[derive(Debug)]
pub struct PendingWrite {
    handle: JoinHandle<SdkResult<()>>,
}

impl PendingWrite {
    /// Spawn `write` on the current tokio runtime.
    pub(crate) fn spawn<F>(write: F) -> Self
    where
        F: Future<Output = SdkResult<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = write.await;
            if let Err(e) = &result {
                warn!("Config document write failed: {}", e);
            }
            result
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the write to complete.
    pub async fn wait(self) -> SdkResult<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(SdkError::Task(e.to_string())),
        }
    }
}
