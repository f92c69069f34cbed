//! Periodic removal of idle product wizard sessions.
//!
//! Expired sessions are already rejected on access; this job only frees
//! the memory of sessions nobody comes back to.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::wizard::WizardRegistry;

/// Run the sweep loop every `interval` until `cancel` is triggered.
pub async fn run(registry: Arc<WizardRegistry>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Wizard session sweeper started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Wizard session sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                let purged = registry.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Wizard sweeper: removed expired sessions");
                } else {
                    tracing::debug!("Wizard sweeper: nothing to remove");
                }
            }
        }
    }
}
