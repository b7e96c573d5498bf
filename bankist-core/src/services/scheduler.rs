//! Deferred one-shot work with a cancellation seam

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Handle to work scheduled with [`schedule_once`]
///
/// Nothing in the user-facing flow cancels a pending task today; the token
/// is used on context shutdown.
#[derive(Debug)]
pub struct ScheduledTask {
    id: Uuid,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Prevent the work from running if it has not started yet
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the task has run or been cancelled
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Run `work` once after `delay`, unless cancelled first
///
/// Must be called from within a tokio runtime.
pub fn schedule_once<F>(delay: Duration, work: F) -> ScheduledTask
where
    F: FnOnce() + Send + 'static,
{
    let (cancel, mut cancelled) = watch::channel(false);
    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                if !*cancelled.borrow() {
                    work();
                }
            }
            // a dropped handle disables this branch instead of cancelling
            Ok(()) = cancelled.changed() => {}
        }
    });
    ScheduledTask {
        id: Uuid::new_v4(),
        cancel,
        handle,
    }
}
