//! # Process lifecycle states.
//!
//! [`ProcessState`] is an ordered enumeration describing how far a worker
//! process has progressed. The ordering is load-bearing: the join phase
//! waits on every process whose state is below [`ProcessState::Joined`].
//!
//! A state never decreases over a process's life, except through an
//! explicit restart, which logically installs a new process in the same
//! worker slot (starting over from `Idle`).

/// Lifecycle stage of a worker process, ordered by progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessState {
    /// Created but not yet started.
    Idle,
    /// Spawn in progress.
    Starting,
    /// The OS process is running.
    Started,
    /// The process reported readiness.
    ///
    /// Reserved for implementations with a readiness handshake;
    /// [`CommandProcess`](crate::CommandProcess) never sets it.
    Acked,
    /// The process exited and has been reaped.
    Joined,
    /// Termination is complete.
    Terminated,
}

impl ProcessState {
    /// Short lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Idle => "idle",
            ProcessState::Starting => "starting",
            ProcessState::Started => "started",
            ProcessState::Acked => "acked",
            ProcessState::Joined => "joined",
            ProcessState::Terminated => "terminated",
        }
    }
}
