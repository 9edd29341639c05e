//! Fan-out over many ids with per-item error collection

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Outcome of a batch: successes and failures, each in input order.
#[derive(Debug)]
pub struct BatchReport<T, E> {
    pub successes: Vec<(String, T)>,
    pub failures: Vec<(String, E)>,
}

impl<T, E> BatchReport<T, E> {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Retrieved N user(s), M error(s)`
    pub fn summary(&self, noun: &str) -> String {
        format!(
            "Retrieved {} {noun}(s), {} error(s)",
            self.successes.len(),
            self.failures.len()
        )
    }
}

/// Run `call` for every id with at most `concurrency` calls in flight.
///
/// A failing id never aborts the batch. Results keep input order.
pub async fn run_batch<T, E, F, Fut>(ids: Vec<String>, concurrency: usize, call: F) -> BatchReport<T, E>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let results: Vec<(String, Result<T, E>)> = stream::iter(ids)
        .map(|id| {
            let pending = call(id.clone());
            async move { (id, pending.await) }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = BatchReport { successes: Vec::new(), failures: Vec::new() };
    for (id, result) in results {
        match result {
            Ok(value) => report.successes.push((id, value)),
            Err(err) => report.failures.push((id, err)),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("id-{i}")).collect()
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let report = run_batch(ids(4), 2, |id| async move {
            if id == "id-1" {
                Err(format!("{id} not found"))
            } else {
                Ok(id.len())
            }
        })
        .await;

        assert_eq!(report.successes.len(), 3);
        assert_eq!(report.failures, vec![("id-1".to_string(), "id-1 not found".to_string())]);
        assert_eq!(report.summary("user"), "Retrieved 3 user(s), 1 error(s)");
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn respects_concurrency_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let report: BatchReport<(), ()> = run_batch(ids(8), 3, |_| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(report.is_success());
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn zero_concurrency_runs_sequentially() {
        let report: BatchReport<String, ()> = run_batch(ids(3), 0, |id| async move { Ok(id) }).await;
        let order: Vec<_> = report.successes.into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, ids(3));
    }
}
