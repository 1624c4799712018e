//! # Global runtime configuration.
//!
//! [`ManagerConfig`] defines the supervisor's behavior: how often the
//! monitor loop polls the restart channel, the event bus capacity, and
//! whether the manager installs its own OS signal listener.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use procvisor::ManagerConfig;
//!
//! let mut cfg = ManagerConfig::default();
//! cfg.poll_interval = Duration::from_millis(50);
//! cfg.handle_signals = false;
//!
//! assert_eq!(cfg.poll_interval, Duration::from_millis(50));
//! ```

use std::time::Duration;

/// Global configuration for the worker manager.
///
/// Controls monitor polling, event bus sizing, and signal handling.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// How long each monitor pass waits on the restart channel before
    /// re-checking for shutdown. Short polling keeps the loop cancellable
    /// without requiring the channel to support interruption directly.
    pub poll_interval: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Install a SIGINT/SIGTERM listener at construction time.
    ///
    /// Disable when the embedding service owns signal handling and calls
    /// [`WorkerManager::kill`](crate::WorkerManager::kill) itself.
    pub handle_signals: bool,
}

impl Default for ManagerConfig {
    /// Provides a default configuration:
    /// - `poll_interval = 100ms`
    /// - `bus_capacity = 1024`
    /// - `handle_signals = true`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            bus_capacity: 1024,
            handle_signals: true,
        }
    }
}
