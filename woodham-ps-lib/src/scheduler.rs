// SPDX-License-Identifier: MPL-2.0

//! Row-parallel execution on a bounded worker pool.

use crate::error::Result;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Runs one task per image row on a fixed-size pool of worker threads.
pub struct RowScheduler {
    pool: ThreadPool,
}

impl RowScheduler {
    /// Pool with `threads` workers, or one per available hardware thread if `None`.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let threads = threads.unwrap_or_else(available_threads).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("woodham-row-{}", i))
            .build()?;
        Ok(Self { pool })
    }

    pub fn nb_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compute `task(y)` for every row `y` in `0..height`.
    ///
    /// Each result lands in the slot of its row, so the output is in row
    /// order whatever the completion order. If any task fails, the remaining
    /// ones are abandoned and one of the errors is returned.
    pub fn map_rows<T, F>(&self, height: usize, task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        self.pool.install(|| {
            (0..height)
                .into_par_iter()
                .map(|y| {
                    let row = task(y);
                    log::trace!("Row {} done", y);
                    row
                })
                .collect()
        })
    }
}

/// Hardware concurrency, at least 1.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
