//! Periodic sweep of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::store::SessionStore;

/// Background task that removes expired sessions on a fixed interval.
///
/// Runs until [`SessionSweeper::stop`] is awaited or the sweeper is
/// dropped.
#[derive(Debug)]
pub struct SessionSweeper {
    cancel: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl SessionSweeper {
    /// Spawns the sweeper on the current tokio runtime.
    pub fn start(store: Arc<SessionStore>, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_secs(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        info!(interval_secs = interval.as_secs(), "Session sweeper started");
        let handle = tokio::spawn(run(store, interval, cancel_rx));

        Self {
            cancel: cancel_tx,
            handle: Some(handle),
        }
    }

    /// Signals the task to exit and waits for it.
    pub async fn stop(mut self) {
        let _ = self.cancel.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Session sweeper task ended abnormally");
            }
        }
    }
}

impl Drop for SessionSweeper {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

async fn run(store: Arc<SessionStore>, interval: Duration, mut cancel: watch::Receiver<bool>) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let removed = store.cleanup_expired_sessions();
                if removed > 0 {
                    info!(removed, remaining = store.active_sessions(), "Expired sessions swept");
                } else {
                    debug!("Session sweep found nothing to remove");
                }
            }
        }
    }

    info!("Session sweeper stopped");
}
