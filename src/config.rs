use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::breaker::BreakerConfig;
use crate::cache::ResultCacheConfig;
use crate::error::{FeedError, Result};
use crate::limiter::RateLimiterConfig;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub cache: ResultCacheConfig,
    pub limiter: RateLimiterConfig,
    pub breaker: BreakerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl FeedConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| FeedError::Config(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
