// src/pipeline/scheduler.rs

//! Bounded-concurrency chunk scheduling.
//!
//! Items are split into contiguous chunks of at most `bound` items. Every
//! task of a chunk runs concurrently, and the next chunk starts only once
//! all of them have settled. Tasks overlap on the current task's executor
//! rather than being spawned, so borrowed state can be shared freely.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;

/// Chunk sizes for `len` items under `bound`, e.g. 12 items, bound 5 → `[5, 5, 2]`.
pub fn chunk_sizes(len: usize, bound: usize) -> Vec<usize> {
    let bound = bound.max(1);
    (0..len.div_ceil(bound))
        .map(|i| bound.min(len - i * bound))
        .collect()
}

/// Run `task(index, item)` over `items` in barrier-separated chunks.
///
/// The output is index-aligned with `items`: slot `i` holds the result of
/// item `i`, or `None` if its task failed. Failed tasks are logged and not
/// retried; they never affect sibling tasks.
pub async fn run_chunked<'a, T, R, E, F, Fut>(
    items: &'a [T],
    bound: usize,
    task: F,
) -> Vec<Option<R>>
where
    F: Fn(usize, &'a T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: Display,
{
    let bound = bound.max(1);
    let mut results = Vec::with_capacity(items.len());
    log::debug!(
        "Scheduling {} tasks in chunks of {:?}",
        items.len(),
        chunk_sizes(items.len(), bound)
    );

    for (chunk_index, chunk) in items.chunks(bound).enumerate() {
        let offset = chunk_index * bound;
        log::debug!(
            "Chunk {} started ({} tasks, items {}..{})",
            chunk_index + 1,
            chunk.len(),
            offset,
            offset + chunk.len()
        );

        let settled = join_all(
            chunk
                .iter()
                .enumerate()
                .map(|(i, item)| task(offset + i, item)),
        )
        .await;

        results.extend(settled.into_iter().enumerate().map(|(i, result)| {
            result
                .map_err(|e| log::warn!("Task {} failed: {}", offset + i, e))
                .ok()
        }));
    }

    results
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Start(usize),
        End(usize),
    }

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(chunk_sizes(12, 5), vec![5, 5, 2]);
        assert_eq!(chunk_sizes(10, 5), vec![5, 5]);
        assert_eq!(chunk_sizes(3, 5), vec![3]);
        assert!(chunk_sizes(0, 5).is_empty());
        assert_eq!(chunk_sizes(2, 0), vec![1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_are_separated_by_a_barrier() {
        let items: Vec<usize> = (0..12).collect();
        let events = Mutex::new(Vec::new());

        let results = run_chunked(&items, 5, |index, item| {
            let events = &events;
            let item = *item;
            async move {
                events.lock().unwrap().push(Event::Start(index));
                // Later items finish first within a chunk.
                tokio::time::sleep(Duration::from_millis(100 - item as u64 * 5)).await;
                events.lock().unwrap().push(Event::End(index));
                Ok::<_, String>(item * 10)
            }
        })
        .await;

        let expected: Vec<Option<usize>> = (0..12).map(|i| Some(i * 10)).collect();
        assert_eq!(results, expected);

        let events = events.into_inner().unwrap();
        let position = |event: Event| events.iter().position(|e| *e == event).unwrap();
        for (chunk_start, chunk_end, next_end) in [(0, 5, 10), (5, 10, 12)] {
            let last_end = (chunk_start..chunk_end).map(|i| position(Event::End(i))).max().unwrap();
            let first_next = (chunk_end..next_end).map(|i| position(Event::Start(i))).min().unwrap();
            assert!(last_end < first_next, "chunk starting at {chunk_start} overlapped the next");
        }

        // Every task of the first chunk started before any of them ended.
        let first_end = (0..5).map(|i| position(Event::End(i))).min().unwrap();
        assert!((0..5).all(|i| position(Event::Start(i)) < first_end));
    }

    #[tokio::test]
    async fn failed_tasks_leave_empty_slots() {
        let items = vec!["a", "boom", "c"];
        let results = run_chunked(&items, 2, |_, item| {
            let item = *item;
            async move {
                if item == "boom" {
                    Err("exploded")
                } else {
                    Ok(item.to_uppercase())
                }
            }
        })
        .await;

        assert_eq!(results, vec![Some("A".to_string()), None, Some("C".to_string())]);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let items: Vec<u8> = Vec::new();
        let results = run_chunked(&items, 5, |_, item| {
            let item = *item;
            async move { Ok::<_, String>(item) }
        })
        .await;
        assert!(results.is_empty());
    }
}
