//! Fixed-size pool of OS threads with a bounded task queue.
//!
//! `run` is a fork-join: it blocks the caller until every submitted item has
//! been processed and returns the outputs in completion order.

use std::sync::mpsc;

use engine_logging::engine_warn;

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
    queue_capacity: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    /// A pool of `workers` threads (at least one) whose queue holds as many
    /// pending items as there are workers.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            workers,
            queue_capacity: workers,
        }
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Runs `task` once per item on at most `workers` threads.
    ///
    /// Each item produces exactly one output. Output order follows completion,
    /// not submission. Submission blocks while `workers + queue_capacity`
    /// items are in flight. A panic in `task` is re-raised on the caller once
    /// every other item has finished.
    pub fn run<I, T, R, F>(&self, items: I, task: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Vec::new();
        }
        let workers = self.workers.min(items.len());

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("tabmate-worker-{index}"))
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                engine_warn!("Failed to build worker pool, running on caller: {}", err);
                return items.into_iter().map(task).collect();
            }
        };

        let in_flight = workers + self.queue_capacity;
        let (permit_tx, permit_rx) = mpsc::sync_channel::<()>(in_flight);
        for _ in 0..in_flight {
            let _ = permit_tx.try_send(());
        }
        let (result_tx, result_rx) = mpsc::channel::<R>();

        pool.in_place_scope(|scope| {
            for item in items {
                if permit_rx.recv().is_err() {
                    break;
                }
                let permit = Permit(permit_tx.clone());
                let result_tx = result_tx.clone();
                let task = &task;
                scope.spawn(move |_| {
                    let _permit = permit;
                    let _ = result_tx.send(task(item));
                });
            }
        });
        drop(result_tx);

        result_rx.into_iter().collect()
    }
}

/// Queue slot held by a submitted item; released on completion or unwind.
struct Permit(mpsc::SyncSender<()>);

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.0.try_send(());
    }
}
