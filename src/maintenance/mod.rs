use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use crate::AppState;

const SESSION_SWEEP_INTERVAL_MINUTES: u64 = 10;

/// Periodically drops expired admin sessions.
pub fn spawn(state: AppState) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(SESSION_SWEEP_INTERVAL_MINUTES * 60);
        loop {
            sleep(interval).await;
            let removed = state.sessions().purge_expired().await;
            if removed > 0 {
                info!(removed, "expired admin sessions purged");
            } else {
                debug!("no expired admin sessions");
            }
        }
    });
}
