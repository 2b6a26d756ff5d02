//! 后台任务
//!
//! 会员过期扫描：唯一不由外部请求驱动的状态迁移。

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::booking::membership;
use crate::core::ServerState;

/// Spawn the periodic membership expiry sweep.
///
/// The sweep itself is one idempotent batch UPDATE, so an overlapping or
/// repeated run never produces further changes.
pub fn spawn_membership_sweep(state: ServerState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(
            state.config.membership_sweep_interval_secs,
        ));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let today = state.today();
            match membership::expire_old_memberships(&state.pool, &today).await {
                Ok(0) => {}
                Ok(expired) => {
                    tracing::info!(expired, "Membership expiry sweep completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Membership expiry sweep failed");
                }
            }
        }
    })
}
