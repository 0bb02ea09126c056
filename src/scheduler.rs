use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::event::{self, AppEvent, Event};

/// Granularity of the auto-change loop; cancellation is observed within one tick.
pub const TICK: Duration = Duration::from_secs(1);

/// Running auto-change loop.
///
/// Sends [`AppEvent::AutoChangeElapsed`] every `interval`. The loop never
/// generates anything itself; the controller decides whether to act.
#[derive(Debug)]
pub struct AutoChange {
    interval: Duration,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoChange {
    pub fn start(interval: Duration, sender: mpsc::UnboundedSender<Event>) -> Self {
        let interval = interval.max(TICK);
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_loop(interval, token.clone(), sender));
        tracing::info!(interval_secs = interval.as_secs(), "auto-change started");
        Self {
            interval,
            token,
            handle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            self.token.cancel();
            tracing::info!("auto-change stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }

    /// Cancel and wait for the loop task to exit.
    pub async fn join(self) {
        self.stop();
        if let Err(e) = self.handle.await {
            tracing::warn!("auto-change task ended abnormally: {e}");
        }
    }
}

async fn run_loop(
    interval: Duration,
    token: CancellationToken,
    sender: mpsc::UnboundedSender<Event>,
) {
    loop {
        let mut waited = Duration::ZERO;
        while waited < interval {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(TICK) => waited += TICK,
            }
        }

        tracing::debug!("auto-change interval elapsed");
        if sender.send(event::app(AppEvent::AutoChangeElapsed)).is_err() {
            return;
        }
    }
}
