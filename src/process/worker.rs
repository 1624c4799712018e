//! # Worker: a named unit owning one or more processes.
//!
//! A [`Worker`] groups the process slots that serve one logical role. Most
//! workers own a single process; more can be added to support rolling
//! restarts without overlap. Processes are kept in insertion order, and
//! every per-worker operation fans over them in that order.
//!
//! Restarting a worker is a worker-level operation: each owned process
//! replaces its underlying OS process while the worker identity (and its
//! registry key) stays put.

use crate::error::ProcessError;
use crate::process::process::{ProcessFactory, ProcessRef};

/// A named logical unit owning an ordered, non-empty set of processes.
pub struct Worker {
    name: String,
    processes: Vec<ProcessRef>,
}

impl Worker {
    /// Creates a worker with one process slot drawn from the factory.
    pub fn new(name: impl Into<String>, factory: &dyn ProcessFactory) -> Self {
        let name = name.into();
        let process = factory.create(&name);
        Self {
            name,
            processes: vec![process],
        }
    }

    /// The worker's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owned processes, in insertion order.
    pub fn processes(&self) -> &[ProcessRef] {
        &self.processes
    }

    /// Mutable iteration over the owned processes, in insertion order.
    pub fn processes_mut(&mut self) -> impl Iterator<Item = &mut ProcessRef> {
        self.processes.iter_mut()
    }

    /// Adds another process slot (e.g., for rolling restarts).
    pub fn add_process(&mut self, factory: &dyn ProcessFactory) {
        self.processes.push(factory.create(&self.name));
    }

    /// Restarts every owned process, forwarding the changed-file hint.
    pub async fn restart(&mut self, reloaded_files: &[String]) -> Result<(), ProcessError> {
        for process in self.processes.iter_mut() {
            process.restart(reloaded_files).await?;
        }
        Ok(())
    }
}
