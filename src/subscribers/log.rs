//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [signal] SIGTERM
//! [started] worker=Worker-0 pid=4242
//! [restart-requested] names=Worker-0,Worker-1
//! [restarted] worker=Worker-0 pid=4310
//! [shutdown-requested]
//! [joined] worker=Worker-0 pid=4310
//! [terminated] worker=Worker-0
//! [manager-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use;
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::SignalReceived => {
                println!("[signal] {}", e.reason.as_deref().unwrap_or("unknown"));
            }
            EventKind::SignalListenerFailed => {
                println!(
                    "[signal-listener-failed] err={}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::ManagerStopped => {
                println!("[manager-stopped]");
            }
            EventKind::ProcessStarted => {
                println!(
                    "[started] worker={:?} pid={:?}",
                    e.worker, e.pid
                );
            }
            EventKind::ProcessJoined => {
                println!("[joined] worker={:?} pid={:?}", e.worker, e.pid);
            }
            EventKind::ProcessTerminated => {
                println!("[terminated] worker={:?}", e.worker);
            }
            EventKind::RestartRequested => {
                println!(
                    "[restart-requested] names={}",
                    e.reason.as_deref().unwrap_or("all")
                );
            }
            EventKind::WorkerRestarted => {
                println!("[restarted] worker={:?} pid={:?}", e.worker, e.pid);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
