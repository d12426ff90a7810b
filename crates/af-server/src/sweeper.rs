//! Background eviction of expired flows.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::state::Engine;

/// Spawns a task that evicts expired flows every `period`.
///
/// The task runs until the returned handle is aborted.
pub fn spawn_sweeper(engine: Arc<Engine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match engine.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "swept expired flows"),
                Err(e) => tracing::warn!(error = %e, "flow sweep failed"),
            }
        }
    })
}
