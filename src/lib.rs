mod breaker;
mod cache;
mod clock;
mod coalesce;
mod config;
mod error;
mod fingerprint;
mod generative;
mod http;
mod limiter;
mod normalize;
mod placeholder;
mod service;
#[doc(hidden)]
pub mod test_support;
pub mod types;
mod upstream;

pub use breaker::{BreakerConfig, LiveTierBreaker};
pub use cache::{ResultCache, ResultCacheConfig};
pub use clock::{Clock, SystemClock};
pub use coalesce::Coalescer;
pub use config::{FeedConfig, UpstreamConfig};
pub use error::{FeedError, Result};
pub use fingerprint::fingerprint;
pub use generative::{GenerativeClient, OpenAiGenerative};
pub use limiter::{RateLimiter, RateLimiterConfig};
pub use normalize::{infer_category, infer_location, infer_severity, normalize};
pub use placeholder::placeholder_records;
pub use service::FeedService;
pub use types::{CanonicalRecord, Category, FeedQuery, RawRecord, Severity};
pub use upstream::{HttpUpstream, UpstreamClient};
