use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    #[serde(default = "default_max_calls")]
    pub max_calls: u32,
}

fn default_window_seconds() -> u64 {
    60
}

fn default_max_calls() -> u32 {
    10
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            max_calls: default_max_calls(),
        }
    }
}

#[derive(Debug, Clone)]
struct RateWindow {
    window_start: u64,
    count: u32,
}

/// Fixed-window call budget per scope. Advisory and process-local: it throttles
/// this process against a metered upstream, it does not coordinate globally.
/// Windows reset lazily on access, so the reset check must run before any read
/// or increment of the count.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: HashMap<String, RateWindow>,
    last_gc_bucket: u64,
}

impl RateLimiter {
    pub fn try_acquire(&mut self, scope: &str, config: &RateLimiterConfig, now: u64) -> bool {
        if config.max_calls == 0 {
            return false;
        }

        if config.window_seconds > 0 {
            let bucket = now / config.window_seconds;
            if bucket != self.last_gc_bucket {
                // Drop scopes whose window lapsed; only the active windows matter.
                let window_seconds = config.window_seconds;
                self.windows
                    .retain(|_, window| now.saturating_sub(window.window_start) < window_seconds);
                self.last_gc_bucket = bucket;
            }
        }

        let window = self.windows.entry(scope.to_string()).or_insert(RateWindow {
            window_start: now,
            count: 0,
        });

        if config.window_seconds == 0 || now.saturating_sub(window.window_start) >= config.window_seconds
        {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < config.max_calls {
            window.count = window.count.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub fn active_scopes(&self) -> usize {
        self.windows.len()
    }
}
