//! # Cross-platform termination-signal handling.
//!
//! Provides [`wait_for_termination_signal`], an async helper that completes
//! when the process receives an interrupt or terminate signal, reporting
//! which one fired so the shutdown path can log it.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! **Other platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`], reported as an interrupt

/// Which termination signal reached the supervisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermSignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl TermSignal {
    /// Conventional signal name for logs.
    pub fn name(self) -> &'static str {
        match self {
            TermSignal::Interrupt => "SIGINT",
            TermSignal::Terminate => "SIGTERM",
        }
    }
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns which signal was
/// received, or `Err` if signal registration fails.
#[cfg(unix)]
pub(crate) async fn wait_for_termination_signal() -> std::io::Result<TermSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok(TermSignal::Interrupt),
        _ = sigterm.recv() => Ok(TermSignal::Terminate),
    }
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners. Returns which signal was
/// received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub(crate) async fn wait_for_termination_signal() -> std::io::Result<TermSignal> {
    tokio::signal::ctrl_c().await.map(|_| TermSignal::Interrupt)
}
