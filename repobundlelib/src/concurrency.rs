//! Bounded-concurrency mapping that keeps input order.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

/// Run `mapper` over `items` with at most `concurrency` calls in flight.
///
/// The result is index-aligned with `items` no matter in which order the
/// calls complete. With `concurrency <= 1` items are processed strictly one
/// after another. Otherwise `min(concurrency, items.len())` workers share a
/// cursor; each claims the next unclaimed index, runs the mapper and keeps
/// the `(index, result)` pair until every worker is done. The cursor is the
/// only state the workers share.
///
/// Workers are cooperative futures polled on the caller's task, so they
/// interleave at the mapper's await points and `mapper` does not need to be
/// `'static`.
pub async fn map_with_concurrency<T, R, F, Fut>(
    items: &[T],
    concurrency: usize,
    mapper: F,
) -> Vec<R>
where
    F: Fn(&T, usize) -> Fut,
    Fut: Future<Output = R>,
{
    if concurrency <= 1 {
        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            results.push(mapper(item, index).await);
        }
        return results;
    }

    let cursor = AtomicUsize::new(0);
    let worker_count = concurrency.min(items.len());
    let cursor = &cursor;
    let mapper = &mapper;

    let workers = (0..worker_count).map(|_| async move {
        let mut produced = Vec::new();
        loop {
            let index = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(item) = items.get(index) else {
                break;
            };
            produced.push((index, mapper(item, index).await));
        }
        produced
    });

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();
    for (index, result) in join_all(workers).await.into_iter().flatten() {
        slots[index] = Some(result);
    }

    // Every index below items.len() is claimed by exactly one worker.
    slots.into_iter().flatten().collect()
}
