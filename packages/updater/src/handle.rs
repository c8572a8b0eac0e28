//! Handle to a spawned update check.

use tokio::task::JoinHandle;

use crate::CheckOutcome;

/// Owns the background task started by [`crate::Updater::spawn`].
///
/// Dropping the handle detaches the task; it keeps running to completion.
#[derive(Debug)]
pub struct UpdateHandle {
    task: JoinHandle<Option<CheckOutcome>>,
}

impl UpdateHandle {
    pub(crate) const fn new(task: JoinHandle<Option<CheckOutcome>>) -> Self {
        Self { task }
    }

    /// Waits for the check to finish.
    ///
    /// Returns `None` if the check failed (the error has already been
    /// logged) or the task was aborted.
    pub async fn join(self) -> Option<CheckOutcome> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => {
                log::info!("Update check was cancelled");
                None
            }
            Err(e) => {
                log::error!("Update check task panicked: {e}");
                None
            }
        }
    }

    /// Cancels the check at its next suspension point.
    ///
    /// A full run that is cancelled mid-way writes nothing.
    pub fn abort(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
