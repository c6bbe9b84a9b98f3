//! Running independent jobs, in order or on a bounded worker pool.

use anyhow::{Context, Result, bail};
use log::{error, info};
use rayon::{ThreadPoolBuilder, prelude::*};

/// Result of a batch operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if self.failed > 0 {
            bail!("{operation} failed: {} succeeded, {} failed", self.succeeded, self.failed);
        }
        Ok(())
    }

    /// Count one job outcome, logging failures.
    pub fn record<T>(&mut self, outcome: &Result<Option<T>>) {
        match outcome {
            Ok(Some(_)) => self.succeeded += 1,
            Ok(None) => self.skipped += 1,
            Err(e) => {
                error!("{e:#}");
                self.failed += 1;
            }
        }
    }
}

/// Run `op` over every task and collect the outcomes in task order.
///
/// With `jobs <= 1` tasks run one after another on the calling thread;
/// otherwise they run on a pool of at most `jobs` threads. Either way this
/// returns only once every task has finished.
pub fn run_tasks<T, R, F>(jobs: usize, tasks: Vec<T>, op: F) -> Result<Vec<Result<R>>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync + Send,
{
    if jobs <= 1 || tasks.len() <= 1 {
        return Ok(tasks.into_iter().map(op).collect());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;
    Ok(pool.install(|| tasks.into_par_iter().map(&op).collect()))
}

/// Run tasks and report a summary line under `label`.
pub fn run_batch<T, R, F>(label: &str, jobs: usize, tasks: Vec<T>, op: F) -> Result<BatchResult>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<Option<R>> + Sync + Send,
{
    let mut result = BatchResult::default();
    for outcome in run_tasks(jobs, tasks, op)? {
        result.record(&outcome);
    }
    info!(
        "{label}: {} succeeded, {} failed, {} skipped",
        result.succeeded, result.failed, result.skipped
    );
    Ok(result)
}
