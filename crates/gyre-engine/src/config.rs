//! Worker pool configuration and validation.

use std::error::Error;
use std::fmt;

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
///
/// Controls how many threads execute parallel sweeps and how many
/// cells each job covers.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 64]`).
    pub worker_count: Option<usize>,
    /// Cells per job. Smaller chunks balance better across workers;
    /// larger ones amortise dispatch. Default: 256. Must be at least 1.
    pub chunk_size: usize,
}

impl WorkerConfig {
    /// Default cells per job.
    pub const DEFAULT_CHUNK_SIZE: usize = 256;

    /// Upper bound on worker threads.
    pub const MAX_WORKERS: usize = 64;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, MAX_WORKERS]`: zero workers
    /// would leave every parallel sweep pending forever.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, Self::MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, Self::MAX_WORKERS),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Errors detected while building a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `chunk_size` is zero.
    InvalidChunkSize,
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed and why.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChunkSize => write!(f, "chunk_size must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}
