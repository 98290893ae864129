//! Cooperative cancellation for in-flight requests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// A cloneable signal that aborts the requests it was attached to.
///
/// Every clone observes the same state. Cancelling is sticky: a handle
/// that has fired stays cancelled, and requests started with it afterwards
/// fail immediately with a cancellation `NetworkError`.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Cancel once `delay` has elapsed. Must be called inside a tokio runtime.
    ///
    /// The timer runs as a detached task until `delay` passes, even if the
    /// request finishes first; dropping the returned `JoinHandle` does not
    /// stop it. Call `abort()` on the handle once the request completes.
    pub fn cancel_after(&self, delay: Duration) -> tokio::task::JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            handle.cancel();
        })
    }

    /// Resolves once the handle is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Unreachable while `self` holds the sender.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
