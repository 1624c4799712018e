//! Error types used by the procvisor runtime and the process layer.
//!
//! This module defines two main error enums:
//!
//! - [`SuperviseError`] — errors raised by the supervising runtime itself.
//! - [`ProcessError`] — errors raised by the underlying process layer.
//!
//! Both types provide `as_label` for logging/metrics. Process-layer failures
//! surfaced during `start`/`join`/`terminate` are not swallowed by the
//! runtime; they propagate to the caller of `WorkerManager::run`.

use thiserror::Error;

/// # Errors produced by the supervising runtime.
///
/// Partial-fleet failure during startup or shutdown is fatal for the
/// supervisor, so process-layer errors bubble up through this type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SuperviseError {
    /// A worker process operation failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl SuperviseError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SuperviseError::Process(e) => e.as_label(),
        }
    }
}

/// # Errors produced by the process layer.
///
/// These represent failures of individual OS worker processes managed by
/// the runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Spawning the worker command failed.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// The program that could not be spawned.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a worker process failed.
    #[error("failed to wait for process {name}: {source}")]
    Wait {
        /// Name of the worker the process belongs to.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Delivering a signal to a pid failed.
    #[error("failed to signal pid {pid}: {message}")]
    Signal {
        /// Target process id.
        pid: u32,
        /// OS-level failure description.
        message: String,
    },
}

impl ProcessError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use procvisor::ProcessError;
    ///
    /// let err = ProcessError::Signal { pid: 42, message: "ESRCH".into() };
    /// assert_eq!(err.as_label(), "process_signal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessError::Spawn { .. } => "process_spawn",
            ProcessError::Wait { .. } => "process_wait",
            ProcessError::Signal { .. } => "process_signal",
        }
    }
}
