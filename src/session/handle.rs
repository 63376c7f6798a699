use super::stats::SessionReport;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

/// Control over a running session
///
/// Dropping the handle cancels the session: the cancel channel closes, the
/// session closes its socket and stops its frame pump.
pub struct SessionHandle {
    id: Uuid,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<SessionReport>>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: Uuid,
        cancel_tx: oneshot::Sender<()>,
        task: JoinHandle<SessionReport>,
    ) -> Self {
        Self {
            id,
            cancel_tx: Some(cancel_tx),
            task: Some(task),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the session task has finished
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Force the session to close; it finishes as a failure
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            info!("[{}] Cancelling session", self.id);
            // The session may already be gone
            let _ = tx.send(());
        }
    }

    /// Wait for the session to finish
    pub async fn wait(mut self) -> SessionReport {
        let Some(task) = self.task.take() else {
            return SessionReport::aborted(self.id, "session task missing");
        };

        match task.await {
            Ok(report) => report,
            Err(e) => {
                error!("[{}] Session task failed: {}", self.id, e);
                SessionReport::aborted(self.id, format!("session task failed: {}", e))
            }
        }
    }
}
