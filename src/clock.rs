use std::time::{SystemTime, UNIX_EPOCH};

/// Time source for cache TTLs, rate-limit windows and the live-tier breaker.
/// Injected so tests can drive expiry without sleeping.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0)
    }
}
