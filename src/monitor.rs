use crate::outbound::Outbound;
use crate::reply;
use crate::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Spawns the periodic idle sweep.
///
/// Each tick evicts every session idle longer than `threshold` and sends the
/// evicted chat a restart notice. Eviction is final: a failed send is logged
/// for that chat and the sweep moves on.
pub fn spawn_idle_monitor(
    sessions: Arc<SessionStore>,
    outbound: Arc<dyn Outbound>,
    interval: Duration,
    threshold: time::Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    sweep_once(&sessions, outbound.as_ref(), threshold).await;
                }
            }
        }
        debug!("idle monitor stopped");
    })
}

async fn sweep_once(sessions: &SessionStore, outbound: &dyn Outbound, threshold: time::Duration) {
    let evicted = sessions.sweep_idle(threshold);
    if evicted.is_empty() {
        return;
    }
    debug!(count = evicted.len(), "evicted idle sessions");
    for chat in evicted {
        if let Err(err) = outbound.send(chat, reply::idle_notice()).await {
            warn!(%chat, error = %err, "failed to deliver idle notice");
        }
    }
}
