use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

/// Single-flight per key: concurrent callers for the same key share one run
/// of the work and all receive its outcome, success or failure.
///
/// A finished flight is dropped from the map, so the next caller after
/// completion starts fresh work.
pub(crate) struct Coalescer<T> {
    inflight: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T: Clone> Coalescer<T> {
    pub(crate) fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn run<F, Fut>(&self, key: &str, work: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let flight = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };
        // If the caller running `work` is dropped, a waiter takes over.
        let outcome = flight.get_or_init(work).await.clone();

        let mut inflight = self.inflight.lock().await;
        if inflight
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, &flight))
        {
            inflight.remove(key);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn waiters_share_a_failure() {
        let coalescer: Coalescer<Result<u32, String>> = Coalescer::new();
        let runs = &AtomicUsize::new(0);
        let work = move || async move {
            runs.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err::<u32, _>("upstream down".to_string())
        };

        let (a, b, c) = tokio::join!(
            coalescer.run("k", work),
            coalescer.run("k", work),
            coalescer.run("k", work)
        );
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(a, Err("upstream down".into()));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[tokio::test]
    async fn finished_flights_are_not_reused() {
        let coalescer: Coalescer<usize> = Coalescer::new();
        let runs = &AtomicUsize::new(0);
        let work = move || async move { runs.fetch_add(1, Ordering::SeqCst) + 1 };

        assert_eq!(coalescer.run("k", work).await, 1);
        assert_eq!(coalescer.run("k", work).await, 2);
        assert!(coalescer.inflight.lock().await.is_empty());
    }
}
