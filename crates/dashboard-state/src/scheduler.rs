use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::context::DashboardContext;

/// Background task that calls [`DashboardContext::refresh`] on a fixed interval.
///
/// The first refresh happens one interval after start. Cancelling or dropping
/// the handle stops the loop.
pub struct RefreshScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start(context: Arc<DashboardContext>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("Refresh scheduler started (every {}s)", interval.as_secs());

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        // a closed channel means the handle is gone
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = context.refresh().await {
                            tracing::warn!("Scheduled refresh failed: {}", e);
                        }
                    }
                }
            }

            tracing::info!("Refresh scheduler stopped");
        });

        Self {
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Signal the loop to stop without waiting for it
    pub fn cancel(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh scheduler task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
