use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BreakerConfig {
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,
}

fn default_cooldown_seconds() -> u64 {
    300
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown_seconds(),
        }
    }
}

/// Circuit breaker for the live tier. A failure opens the breaker until a
/// recorded reopen timestamp; the check is synchronous on each request, there
/// is no scheduled re-enable callback.
#[derive(Debug, Default)]
pub struct LiveTierBreaker {
    open_until: Option<u64>,
    last_error: Option<String>,
}

impl LiveTierBreaker {
    pub fn allows(&self, now_epoch_seconds: u64) -> bool {
        match self.open_until {
            Some(until) => now_epoch_seconds >= until,
            None => true,
        }
    }

    pub fn record_failure(&mut self, now_epoch_seconds: u64, cooldown_seconds: u64, message: String) {
        self.open_until = Some(now_epoch_seconds.saturating_add(cooldown_seconds));
        self.last_error = Some(message);
    }

    pub fn record_success(&mut self) {
        self.open_until = None;
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_breaker_allows() {
        let breaker = LiveTierBreaker::default();
        assert!(breaker.allows(0));
    }

    #[test]
    fn failure_opens_until_cooldown_elapses() {
        let mut breaker = LiveTierBreaker::default();
        breaker.record_failure(100, 300, "quota".to_string());
        assert!(!breaker.allows(100));
        assert!(!breaker.allows(399));
        assert!(breaker.allows(400));
        assert_eq!(breaker.last_error(), Some("quota"));
    }

    #[test]
    fn success_closes_immediately() {
        let mut breaker = LiveTierBreaker::default();
        breaker.record_failure(100, 300, "down".to_string());
        breaker.record_success();
        assert!(breaker.allows(101));
        assert!(breaker.last_error().is_none());
    }
}
