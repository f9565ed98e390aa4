//! Thread pool executing parallel sweep jobs.
//!
//! Each worker receives boxed jobs via a shared crossbeam channel and
//! runs them to completion. Jobs report their own results through
//! reply channels they carry; the pool only moves closures. A job that
//! panics is caught so the worker survives, and its captured reply
//! sender is dropped, which the waiting side observes as a lost reply.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::config::{ConfigError, WorkerConfig};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads fed by one job channel.
///
/// Shareable by any number of automata. Dropping the pool closes the
/// channel, lets queued jobs finish, and joins every thread.
pub struct WorkerPool {
    job_tx: Option<Sender<Job>>,
    threads: Vec<JoinHandle<()>>,
    chunk_size: usize,
}

// Compile-time assertion: WorkerPool can be shared between driver threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<WorkerPool>();
};

impl WorkerPool {
    /// Validate `config` and spawn the worker threads.
    pub fn new(config: &WorkerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let count = config.resolved_worker_count();
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();

        let mut threads = Vec::with_capacity(count);
        for i in 0..count {
            let rx = job_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("gyre-worker-{i}"))
                .spawn(move || worker_loop(rx, i))
                .map_err(|e| ConfigError::ThreadSpawnFailed {
                    reason: format!("gyre-worker-{i}: {e}"),
                })?;
            threads.push(handle);
        }
        tracing::debug!(workers = count, chunk_size = config.chunk_size, "worker pool started");

        Ok(Self {
            job_tx: Some(job_tx),
            threads,
            chunk_size: config.chunk_size,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.threads.len()
    }

    /// Cells per sweep job.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Queue a job. Never blocks.
    ///
    /// If the pool is shutting down the job is dropped unexecuted, which
    /// drops whatever reply sender it captured.
    pub(crate) fn execute(&self, job: impl FnOnce() + Send + 'static) {
        let Some(tx) = &self.job_tx else {
            return;
        };
        if tx.send(Box::new(job)).is_err() {
            tracing::warn!("worker pool has no live workers; job dropped");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel ends each worker's recv loop.
        self.job_tx.take();
        let mut joined = 0;
        for handle in self.threads.drain(..) {
            if handle.join().is_ok() {
                joined += 1;
            }
        }
        tracing::debug!(joined, "worker pool shut down");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.threads.len())
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

/// Runs until the job channel is closed (pool dropped).
fn worker_loop(job_rx: Receiver<Job>, worker: usize) {
    while let Ok(job) = job_rx.recv() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::warn!(worker, "sweep job panicked; its chunk is lost");
        }
    }
}
