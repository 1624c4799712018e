//! # Runtime events emitted by the worker manager.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: fleet phases (start, join, terminate)
//! - **Restart events**: dispatch of live-reload requests
//! - **Shutdown events**: signal delivery and sentinel observation
//!
//! The [`Event`] struct carries metadata such as timestamps, the worker
//! name, the pid, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use procvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ProcessStarted)
//!     .with_worker("Worker-0")
//!     .with_pid(4242);
//!
//! assert_eq!(ev.kind, EventKind::ProcessStarted);
//! assert_eq!(ev.worker.as_deref(), Some("Worker-0"));
//! assert_eq!(ev.pid, Some(4242));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Shutdown events ===
    /// A termination signal reached the supervisor.
    ///
    /// Sets:
    /// - `reason`: signal name (e.g., "SIGTERM")
    SignalReceived,

    /// The signal listener could not register its handlers.
    ///
    /// Sets:
    /// - `reason`: registration failure description
    SignalListenerFailed,

    /// The shutdown sentinel was observed on the restart channel; the
    /// monitor loop is handing control to the join phase.
    ShutdownRequested,

    /// `run()` finished its full sequence and is about to return.
    ManagerStopped,

    // === Lifecycle events ===
    /// A worker process was started.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `pid`: pid of the new process
    ProcessStarted,

    /// A worker process was reaped by the join phase.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `pid`: pid of the reaped process, when known
    ProcessJoined,

    /// Termination was requested for a worker process.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `pid`: pid the request targeted, when known
    ProcessTerminated,

    // === Restart events ===
    /// A restart record was received from the channel and is being
    /// dispatched.
    ///
    /// Sets:
    /// - `reason`: the requested name filter ("all" for no filter)
    RestartRequested,

    /// A transient worker completed a restart cycle.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `pid`: pid of the replacement process, when known
    WorkerRestarted,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker, if applicable.
    pub worker: Option<Arc<str>>,
    /// Pid of the affected process, if applicable.
    pub pid: Option<u32>,
    /// Human-readable reason (signal names, filters, errors).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            pid: None,
            reason: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a pid.
    #[inline]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
