use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::breaker::LiveTierBreaker;
use crate::cache::ResultCache;
use crate::clock::{Clock, SystemClock};
use crate::coalesce::Coalescer;
use crate::config::FeedConfig;
use crate::error::Result;
use crate::generative::GenerativeClient;
use crate::limiter::RateLimiter;
use crate::normalize::normalize;
use crate::placeholder::placeholder_records;
use crate::types::{CanonicalRecord, FeedQuery};
use crate::upstream::UpstreamClient;

/// The aggregation layer: cache, coalescing, rate limiting and the tiered
/// fallback chain behind one total `fetch`. Construct one instance per logical
/// service and pass it by reference (or clone it, which shares state).
///
/// Consumers never see which tier answered and never see an error: live data
/// when possible, generated data when not, canned records as the floor.
#[derive(Clone)]
pub struct FeedService {
    config: FeedConfig,
    upstream: Arc<dyn UpstreamClient>,
    generative: Option<Arc<dyn GenerativeClient>>,
    clock: Arc<dyn Clock>,
    state: Arc<SharedState>,
}

struct SharedState {
    cache: Mutex<ResultCache<Vec<CanonicalRecord>>>,
    limiter: Mutex<RateLimiter>,
    breaker: Mutex<LiveTierBreaker>,
    coalescer: Coalescer<Vec<CanonicalRecord>>,
}

impl FeedService {
    pub fn new(config: FeedConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        let cache = ResultCache::new(config.cache.clone());
        Self {
            config,
            upstream,
            generative: None,
            clock: Arc::new(SystemClock),
            state: Arc::new(SharedState {
                cache: Mutex::new(cache),
                limiter: Mutex::new(RateLimiter::default()),
                breaker: Mutex::new(LiveTierBreaker::default()),
                coalescer: Coalescer::new(),
            }),
        }
    }

    pub fn with_generative(mut self, generative: Arc<dyn GenerativeClient>) -> Self {
        self.generative = Some(generative);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Total: always returns a non-empty set of records, never an error.
    /// Repeated calls within the TTL are served from cache; concurrent calls
    /// for the same query share one underlying attempt.
    pub async fn fetch(&self, query: &FeedQuery) -> Vec<CanonicalRecord> {
        let key = query.fingerprint();
        let now = self.clock.now_epoch_seconds();
        if let Some(hit) = lock(&self.state.cache).get(&key, now) {
            debug!(fingerprint = %key, "cache hit");
            return hit;
        }

        let service = self.clone();
        let query = query.clone();
        let producer_key = key.clone();
        self.state
            .coalescer
            .run(&key, move || async move {
                service.produce(&query, &producer_key).await
            })
            .await
    }

    async fn produce(&self, query: &FeedQuery, key: &str) -> Vec<CanonicalRecord> {
        // Losing the registration race can land a caller here after the winner
        // already wrote the cache.
        let now = self.clock.now_epoch_seconds();
        if let Some(hit) = lock(&self.state.cache).get(key, now) {
            return hit;
        }

        let records = self.attempt_tiers(query).await;

        // The cache write happens inside the coalesced future, so it is
        // visible before the coalescer deregisters the in-flight slot.
        let now = self.clock.now_epoch_seconds();
        lock(&self.state.cache).insert(key.to_string(), records.clone(), now);
        records
    }

    async fn attempt_tiers(&self, query: &FeedQuery) -> Vec<CanonicalRecord> {
        match self.attempt_live(query).await {
            Ok(Some(records)) if !records.is_empty() => {
                lock(&self.state.breaker).record_success();
                return records;
            }
            Ok(Some(_)) => {
                debug!(operation = query.operation(), "live tier returned no records");
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    operation = query.operation(),
                    upstream = self.upstream.name(),
                    error = %err,
                    timeout = err.is_timeout(),
                    quota = err.is_quota(),
                    "live tier failed, advancing fallback chain"
                );
                let now = self.clock.now_epoch_seconds();
                lock(&self.state.breaker).record_failure(
                    now,
                    self.config.breaker.cooldown_seconds,
                    err.to_string(),
                );
            }
        }

        if let Some(generative) = &self.generative {
            if generative.configured() {
                match generative.generate(query).await {
                    Ok(records) if !records.is_empty() => {
                        debug!(operation = query.operation(), "generative tier answered");
                        return records;
                    }
                    Ok(_) => {
                        warn!(operation = query.operation(), "generative tier returned no records");
                    }
                    Err(err) => {
                        warn!(
                            operation = query.operation(),
                            error = %err,
                            "generative tier failed, serving placeholders"
                        );
                    }
                }
            } else {
                debug!("generative tier skipped: no credentials");
            }
        }

        debug!(operation = query.operation(), "serving placeholder records");
        placeholder_records(query.operation())
    }

    /// `Ok(None)` means the live tier was skipped without counting as a
    /// failure: missing credentials, an open breaker, or an exhausted rate
    /// window. A skipped tier consumes no rate-limit permit.
    async fn attempt_live(&self, query: &FeedQuery) -> Result<Option<Vec<CanonicalRecord>>> {
        if !self.upstream.configured() {
            debug!(upstream = self.upstream.name(), "live tier skipped: no credentials");
            return Ok(None);
        }

        let now = self.clock.now_epoch_seconds();
        if !lock(&self.state.breaker).allows(now) {
            debug!(operation = query.operation(), "live tier skipped: breaker open");
            return Ok(None);
        }
        if !lock(&self.state.limiter).try_acquire(query.operation(), &self.config.limiter, now) {
            debug!(operation = query.operation(), "live tier skipped: rate limited");
            return Ok(None);
        }

        let raw = self.upstream.fetch(query).await?;
        let location = query.location();
        Ok(Some(
            raw.iter().map(|record| normalize(record, location)).collect(),
        ))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
