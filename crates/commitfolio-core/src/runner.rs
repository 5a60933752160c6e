use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use crate::{Error, Result};

/// Completion event for a single work item, delivered in completion order.
#[derive(Debug)]
pub struct Completion<'a, T, E> {
    /// Submission index of the item that just resolved.
    pub index: usize,
    /// Items resolved so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub outcome: &'a std::result::Result<T, E>,
}

impl<T, E> Completion<'_, T, E> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs deferred async work items with at most `limit` of them in flight.
///
/// Admission is a sliding window: as soon as one item resolves, the next
/// queued item is started. All futures are polled on the calling task, so
/// they do not need to be `Send` or `'static`.
///
/// A failing item never cancels its siblings. Its error lands in its own
/// result slot and the caller decides what to do with it.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRunner {
    limit: usize,
}

impl BoundedRunner {
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidConcurrency(limit));
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run every task and return the outcomes index-aligned with `tasks`.
    pub async fn run<T, E, F, Fut>(&self, tasks: Vec<F>) -> Vec<std::result::Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.run_with(tasks, |_| {}).await
    }

    /// Like [`run`](Self::run), invoking `on_complete` each time an item resolves.
    pub async fn run_with<T, E, F, Fut, C>(
        &self,
        tasks: Vec<F>,
        mut on_complete: C,
    ) -> Vec<std::result::Result<T, E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        C: FnMut(Completion<'_, T, E>),
    {
        let total = tasks.len();
        let mut slots: Vec<Option<std::result::Result<T, E>>> = (0..total).map(|_| None).collect();
        let mut queued = tasks.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut completed = 0;

        tracing::debug!("Running {} work items with limit {}", total, self.limit);

        loop {
            while in_flight.len() < self.limit {
                let Some((index, task)) = queued.next() else {
                    break;
                };
                let work = task();
                in_flight.push(async move { (index, work.await) });
            }

            let Some((index, outcome)) = in_flight.next().await else {
                break;
            };

            completed += 1;
            on_complete(Completion {
                index,
                completed,
                total,
                outcome: &outcome,
            });
            slots[index] = Some(outcome);
        }

        // Every slot was filled exactly once by the loop above.
        let results: Vec<_> = slots.into_iter().flatten().collect();
        debug_assert_eq!(results.len(), total);
        results
    }
}
