//! Stopping the HTTP listener.
//!
//! `axum::serve` watches the serve token; [`ShutdownCoordinator::drain`]
//! cancels it and waits for the serve task to let in-flight requests finish.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{info, warn};

/// How the serve task ended during [`ShutdownCoordinator::drain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// In-flight requests completed and the task returned.
    Drained,
    /// The task panicked or was already aborted.
    Failed,
    /// The timeout elapsed first; the task was aborted.
    Aborted,
}

/// Owns the serve token of one listener.
#[derive(Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a coordinator with a fresh serve token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Future handed to `with_graceful_shutdown`; resolves once draining starts.
    pub(crate) fn serve_signal(&self) -> WaitForCancellationFutureOwned {
        self.token.clone().cancelled_owned()
    }

    /// Whether draining has started.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop accepting connections and wait up to `timeout` for the serve task.
    ///
    /// A serve task still running at the deadline is aborted, dropping any
    /// open connections.
    pub async fn drain(&self, listener: JoinHandle<()>, timeout: Duration) -> DrainOutcome {
        self.token.cancel();
        info!(timeout_ms = timeout.as_millis(), "draining emoji search listener");

        let abort = listener.abort_handle();
        match tokio::time::timeout(timeout, listener).await {
            Ok(Ok(())) => DrainOutcome::Drained,
            Ok(Err(e)) => {
                warn!(error = %e, "listener task ended abnormally");
                DrainOutcome::Failed
            }
            Err(_) => {
                abort.abort();
                warn!(?timeout, "listener still busy at shutdown deadline, aborting");
                DrainOutcome::Aborted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_coordinator_is_serving() {
        assert!(!ShutdownCoordinator::new().is_shutting_down());
    }

    #[tokio::test]
    async fn drain_releases_serve_signal() {
        let coord = ShutdownCoordinator::new();
        let signal = coord.serve_signal();
        let listener = tokio::spawn(signal);

        let outcome = coord.drain(listener, Duration::from_secs(5)).await;
        assert_eq!(outcome, DrainOutcome::Drained);
        assert!(coord.is_shutting_down());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_aborts_stuck_listener() {
        let coord = ShutdownCoordinator::new();
        let listener = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(300)).await;
        });
        let abort = listener.abort_handle();

        let outcome = coord.drain(listener, Duration::from_millis(100)).await;
        assert_eq!(outcome, DrainOutcome::Aborted);
        for _ in 0..10 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }

    #[tokio::test]
    async fn drain_reports_panicked_listener() {
        let coord = ShutdownCoordinator::new();
        let listener = tokio::spawn(async {
            panic!("listener blew up");
        });

        let outcome = coord.drain(listener, Duration::from_secs(5)).await;
        assert_eq!(outcome, DrainOutcome::Failed);
    }
}
