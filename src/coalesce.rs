use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

type SharedFuture<T> = Shared<BoxFuture<'static, T>>;

/// Singleflight registry: at most one in-flight producer per key. Concurrent
/// callers for the same key join the same shared future and observe the same
/// settled value. The registry mutex is synchronous and never held across an
/// await, so registration and cleanup are atomic between suspension points.
pub struct Coalescer<T: Clone> {
    in_flight: Mutex<HashMap<String, SharedFuture<T>>>,
}

impl<T: Clone> Default for Coalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Coalescer<T> {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn in_flight_count(&self) -> usize {
        lock(&self.in_flight).len()
    }
}

impl<T: Clone + Send + Sync + 'static> Coalescer<T> {
    /// Runs `producer` unless a call for `key` is already in flight, in which
    /// case its pending future is joined instead. The registration is removed
    /// as soon as the future settles, success or failure, before the value is
    /// handed back.
    pub async fn run<F, Fut>(&self, key: &str, producer: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut in_flight = lock(&self.in_flight);
            if let Some(existing) = in_flight.get(key) {
                existing.clone()
            } else {
                let shared = producer().boxed().shared();
                in_flight.insert(key.to_string(), shared.clone());
                shared
            }
        };

        let value = shared.clone().await;

        // Every waiter attempts the cleanup; ptr_eq keeps a slow waiter from
        // evicting a newer in-flight entry registered under the same key.
        let mut in_flight = lock(&self.in_flight);
        if in_flight
            .get(key)
            .is_some_and(|current| current.ptr_eq(&shared))
        {
            in_flight.remove(key);
        }
        drop(in_flight);

        value
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn concurrent_callers_share_one_producer_invocation() {
        let coalescer = Coalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let producer = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            "value"
        };

        let (a, b) = tokio::join!(
            coalescer.run("k", || producer(Arc::clone(&calls))),
            coalescer.run("k", || producer(Arc::clone(&calls))),
        );

        assert_eq!(a, "value");
        assert_eq!(b, "value");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_coalesce() {
        let coalescer = Coalescer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let producer = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
        };

        tokio::join!(
            coalescer.run("a", || producer(Arc::clone(&calls))),
            coalescer.run("b", || producer(Arc::clone(&calls))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn registration_is_removed_once_settled() {
        let coalescer = Coalescer::new();
        coalescer.run("k", || async { 1u32 }).await;
        assert_eq!(coalescer.in_flight_count(), 0);

        // A later call must invoke its own producer again.
        let second = coalescer.run("k", || async { 2u32 }).await;
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn waiters_observe_the_same_value_on_failure_shaped_results() {
        let coalescer: Coalescer<Result<u32, String>> = Coalescer::new();

        let (a, b) = tokio::join!(
            coalescer.run("k", || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err::<u32, String>("boom".to_string())
            }),
            coalescer.run("k", || async { Ok(7) }),
        );

        assert_eq!(a, b);
        assert_eq!(coalescer.in_flight_count(), 0);
    }
}
