//! Bounded worker-pool mapping with per-item failure isolation.
//!
//! Sizing matched directories and hashing duplicate candidates are the two
//! I/O-bound fan-outs of a scan. Both go through [`parallel_map`]: items are
//! dispatched to a dedicated rayon pool, every item's outcome (value, error or
//! caught panic) is sent back over a channel, and the caller drains the
//! channel on its own thread. Workers never touch the caller's collections.

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

use thiserror::Error;

/// Below this many items work runs sequentially on the calling thread.
pub const MIN_PARALLEL_ITEMS: usize = 2;

/// Hard ceiling on worker threads.
pub const MAX_WORKERS: usize = 32;

/// Worker pool configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parallelism {
    enabled: bool,
    max_workers: usize,
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

impl Parallelism {
    /// Parallel execution with at most `max_workers` threads, clamped to
    /// `1..=MAX_WORKERS`.
    pub fn new(max_workers: usize) -> Self {
        Self {
            enabled: true,
            max_workers: max_workers.clamp(1, MAX_WORKERS),
        }
    }

    /// Everything runs on the calling thread, in input order.
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            max_workers: 1,
        }
    }

    /// Whether parallel execution is enabled at all
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Upper bound on worker threads
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn runs_parallel(&self, items: usize) -> bool {
        self.enabled && items >= MIN_PARALLEL_ITEMS
    }
}

/// Worker count derived from the host, between 1 and [`MAX_WORKERS`].
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .clamp(1, MAX_WORKERS)
}

/// Why a single item produced no value.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The mapping function returned an error
    #[error("{0}")]
    Failed(E),
    /// The mapping function panicked
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Applies `f` to every item and hands each `(item, outcome)` to
/// `on_complete` as soon as it is available.
///
/// With fewer than [`MIN_PARALLEL_ITEMS`] items, or when parallelism is
/// disabled, items run sequentially and complete in input order. Otherwise
/// completion order is unspecified. One item failing or panicking never
/// affects the others. `on_complete` always runs on the calling thread.
pub fn parallel_map<T, R, E, F, C>(items: Vec<T>, parallelism: &Parallelism, f: F, on_complete: C)
where
    T: Send,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
    C: FnMut(T, Result<R, TaskError<E>>),
{
    if !parallelism.runs_parallel(items.len()) {
        run_sequential(items, &f, on_complete);
        return;
    }

    let threads = parallelism.max_workers().min(items.len());
    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("bloat-hunter-worker-{index}"))
        .build()
    {
        Ok(pool) => pool,
        // Without a pool the work still gets done, just on this thread
        Err(_) => {
            run_sequential(items, &f, on_complete);
            return;
        }
    };

    let mut on_complete = on_complete;
    let f = &f;
    let (tx, rx) = mpsc::channel();

    pool.in_place_scope(|scope| {
        for item in items {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let outcome = run_one(f, &item);
                // The receiver outlives every worker; a failed send cannot happen
                let _ = tx.send((item, outcome));
            });
        }
        drop(tx);

        for (item, outcome) in rx {
            on_complete(item, outcome);
        }
    });
}

/// Like [`parallel_map`] but returns every `(item, outcome)` pair in the
/// original input order.
pub fn parallel_map_ordered<T, R, E, F>(
    items: Vec<T>,
    parallelism: &Parallelism,
    f: F,
) -> Vec<(T, Result<R, TaskError<E>>)>
where
    T: Send,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync,
{
    let mut slots: Vec<Option<(T, Result<R, TaskError<E>>)>> =
        std::iter::repeat_with(|| None).take(items.len()).collect();
    let indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();

    parallel_map(
        indexed,
        parallelism,
        |(_, item)| f(item),
        |(index, item), outcome| slots[index] = Some((item, outcome)),
    );

    slots.into_iter().flatten().collect()
}

fn run_sequential<T, R, E, F, C>(items: Vec<T>, f: &F, mut on_complete: C)
where
    F: Fn(&T) -> Result<R, E>,
    C: FnMut(T, Result<R, TaskError<E>>),
{
    for item in items {
        let outcome = run_one(f, &item);
        on_complete(item, outcome);
    }
}

fn run_one<T, R, E, F>(f: &F, item: &T) -> Result<R, TaskError<E>>
where
    F: Fn(&T) -> Result<R, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| f(item))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(TaskError::Failed(err)),
        Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Barrier;
    use std::thread::{self, ThreadId};
    use std::time::Duration;

    use super::*;

    fn double(x: &u32) -> Result<u32, String> {
        Ok(x * 2)
    }

    #[test]
    fn test_parallelism_defaults() {
        let config = Parallelism::default();
        assert!(config.enabled());
        assert!(config.max_workers() >= 1);
        assert!(config.max_workers() <= MAX_WORKERS);
    }

    #[test]
    fn test_parallelism_clamps_workers() {
        assert_eq!(Parallelism::new(0).max_workers(), 1);
        assert_eq!(Parallelism::new(100).max_workers(), MAX_WORKERS);
        assert_eq!(Parallelism::new(8).max_workers(), 8);
        assert!(!Parallelism::sequential().enabled());
    }

    #[test]
    fn test_empty_input() {
        let mut seen = 0;
        parallel_map(Vec::<u32>::new(), &Parallelism::new(4), double, |_, _| {
            seen += 1
        });
        assert_eq!(seen, 0);
        assert!(parallel_map_ordered(Vec::<u32>::new(), &Parallelism::new(4), double).is_empty());
    }

    #[test]
    fn test_single_item_runs_on_calling_thread() {
        let caller = thread::current().id();
        let mut results = Vec::new();
        parallel_map(
            vec![21_u32],
            &Parallelism::new(4),
            |x| Ok::<_, String>((x * 2, thread::current().id())),
            |item, outcome| results.push((item, outcome.unwrap())),
        );
        assert_eq!(results, vec![(21, (42, caller))]);
    }

    #[test]
    fn test_disabled_runs_sequentially_in_order() {
        let caller = thread::current().id();
        let mut order = Vec::new();
        parallel_map(
            vec![1_u32, 2, 3, 4, 5],
            &Parallelism::sequential(),
            |x| {
                assert_eq!(thread::current().id(), caller);
                Ok::<_, String>(*x)
            },
            |item, _| order.push(item),
        );
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parallel_produces_every_result() {
        let items: Vec<u32> = (0..50).collect();
        let mut results = Vec::new();
        parallel_map(items, &Parallelism::new(4), double, |item, outcome| {
            results.push((item, outcome.unwrap()))
        });
        results.sort_unstable();
        let expected: Vec<(u32, u32)> = (0..50).map(|x| (x, x * 2)).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_errors_are_isolated() {
        let mut ok = 0;
        let mut failed = Vec::new();
        parallel_map(
            (0..10_u32).collect(),
            &Parallelism::new(4),
            |x| {
                if x % 3 == 0 {
                    Err(format!("bad {x}"))
                } else {
                    Ok(*x)
                }
            },
            |item, outcome| match outcome {
                Ok(_) => ok += 1,
                Err(TaskError::Failed(message)) => failed.push((item, message)),
                Err(TaskError::Panicked(message)) => panic!("unexpected panic: {message}"),
            },
        );
        failed.sort();
        assert_eq!(ok, 6);
        assert_eq!(
            failed,
            vec![
                (0, "bad 0".to_string()),
                (3, "bad 3".to_string()),
                (6, "bad 6".to_string()),
                (9, "bad 9".to_string()),
            ]
        );
    }

    #[test]
    fn test_panics_are_isolated() {
        for parallelism in [Parallelism::new(4), Parallelism::sequential()] {
            let results = parallel_map_ordered((0..6_u32).collect(), &parallelism, |x| {
                if *x == 2 {
                    panic!("boom on {x}");
                }
                Ok::<_, String>(*x)
            });

            assert_eq!(results.len(), 6);
            for (item, outcome) in results {
                if item == 2 {
                    assert!(
                        matches!(outcome, Err(TaskError::Panicked(ref m)) if m.contains("boom on 2"))
                    );
                } else {
                    assert_eq!(outcome.unwrap(), item);
                }
            }
        }
    }

    #[test]
    fn test_actually_parallel() {
        // Both tasks must be in flight at once or the barrier never opens
        let barrier = Barrier::new(2);
        let results = parallel_map_ordered(vec![0_u32, 1], &Parallelism::new(2), |_| {
            barrier.wait();
            Ok::<_, String>(thread::current().id())
        });
        let threads: HashSet<ThreadId> = results
            .into_iter()
            .map(|(_, outcome)| outcome.unwrap())
            .collect();
        assert_eq!(threads.len(), 2);
    }

    #[test]
    fn test_ordered_preserves_input_order() {
        let items: Vec<u64> = (0..20).collect();
        let results = parallel_map_ordered(items.clone(), &Parallelism::new(8), |x| {
            // Later items finish first
            thread::sleep(Duration::from_millis(20 - x));
            Ok::<_, String>(x * 10)
        });
        let returned: Vec<u64> = results.iter().map(|(item, _)| *item).collect();
        assert_eq!(returned, items);
        for (item, outcome) in results {
            assert_eq!(outcome.unwrap(), item * 10);
        }
    }

    #[test]
    fn test_ordered_keeps_errors_in_place() {
        let results = parallel_map_ordered(vec![1_i32, -1, 2], &Parallelism::new(3), |x| {
            if *x < 0 { Err("negative") } else { Ok(*x) }
        });
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(TaskError::Failed("negative"))));
        assert!(results[2].1.is_ok());
    }
}
