//! # Process contract and the factory seam.
//!
//! [`ManagedProcess`] is the contract the supervisor consumes: observable
//! state and pid plus the start/join/terminate/restart operations. The
//! supervisor never looks past it, so any process representation can sit
//! behind a worker slot (an OS child, a test double, a remote handle).
//!
//! [`ProcessFactory`] produces a fresh process for a worker slot. It is the
//! crate's entry-point seam: the worker's settings and any shared execution
//! context ride inside the factory (struct fields or closure captures).
//! [`FactoryFn`] adapts a plain closure.

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::process::state::ProcessState;

/// Owned handle to a supervised process.
pub type ProcessRef = Box<dyn ManagedProcess>;

/// # One OS process plus its observable lifecycle.
///
/// Implementations must keep [`state`](ManagedProcess::state) monotonically
/// increasing, except through [`restart`](ManagedProcess::restart), which
/// installs a fresh process in the slot and may reset the state to
/// `Idle`/`Started`.
#[async_trait]
pub trait ManagedProcess: Send + Sync {
    /// Name of the worker this process belongs to.
    fn name(&self) -> &str;

    /// Current lifecycle stage.
    fn state(&self) -> ProcessState;

    /// Pid of the underlying OS process, once started.
    fn pid(&self) -> Option<u32>;

    /// Whether the OS process is currently running.
    fn is_alive(&self) -> bool;

    /// Starts the underlying process. Idempotent once started.
    async fn start(&mut self) -> Result<(), ProcessError>;

    /// Blocks until the process exits, then marks it reaped.
    ///
    /// A no-op at [`ProcessState::Joined`] or later.
    async fn join(&mut self) -> Result<(), ProcessError>;

    /// Requests process exit. Idempotent against dead processes.
    async fn terminate(&mut self) -> Result<(), ProcessError>;

    /// Replaces the underlying process with a fresh one.
    ///
    /// `reloaded_files` is an opaque changed-file hint forwarded from the
    /// restart channel.
    async fn restart(&mut self, reloaded_files: &[String]) -> Result<(), ProcessError>;
}

/// Produces a fresh [`ManagedProcess`] for a worker slot.
///
/// A factory is consulted once per process slot (at `manage` time and on
/// [`Worker::add_process`](crate::Worker::add_process)); restarts are
/// handled by the process itself.
pub trait ProcessFactory: Send + Sync {
    /// Creates a process for the worker with the given name.
    fn create(&self, name: &str) -> ProcessRef;
}

/// Function-backed process factory.
///
/// Wraps a closure that creates a new process per slot, the simplest way
/// to close over shared context:
///
/// ```rust
/// use procvisor::{CommandProcess, CommandSpec, FactoryFn, ProcessRef};
///
/// let spec = CommandSpec::new("my-server");
/// let factory = FactoryFn::new(move |name: &str| -> ProcessRef {
///     Box::new(CommandProcess::new(name, spec.clone()))
/// });
/// # let _ = factory;
/// ```
pub struct FactoryFn<F> {
    f: F,
}

impl<F> FactoryFn<F>
where
    F: Fn(&str) -> ProcessRef + Send + Sync,
{
    /// Creates a new function-backed factory.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ProcessFactory for FactoryFn<F>
where
    F: Fn(&str) -> ProcessRef + Send + Sync,
{
    fn create(&self, name: &str) -> ProcessRef {
        (self.f)(name)
    }
}
