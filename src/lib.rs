//! # procvisor
//!
//! **Procvisor** is a lightweight process-fleet supervisor for Rust.
//!
//! It lets a long-running service host multiple OS worker processes under
//! one controlling process, survive partial failures, live-restart a
//! subset of named workers, and turn OS termination signals into an
//! orderly shutdown sequence. The crate is designed as a building block
//! for higher-level servers and daemons.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Worker-0   │   │   Worker-1   │   │   reloader   │
//!     │  (transient) │   │  (transient) │   │  (durable)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WorkerManager (supervising task)                                 │
//! │  - transient + durable worker collections                         │
//! │  - RestartSubscriber (polls for restart commands / sentinel)      │
//! │  - WorkerRegistry (shared worker-state table, supervisor pid)     │
//! │  - Bus (broadcast lifecycle events to subscribers)                │
//! └──────────────┬──────────────────────────────────┬─────────────────┘
//!                │                                  │
//!        OS processes (pid,                  signal listener
//!        start/join/terminate/restart)       (SIGINT / SIGTERM)
//! ```
//!
//! ### Lifecycle
//! ```text
//! WorkerManager::run()
//!   ├─► start()      spawn every process, record pids in the registry
//!   ├─► monitor()    loop {
//!   │                  poll restart channel (bounded by poll_interval)
//!   │                  ├─ Restart{names, files} ─► restart matching
//!   │                  │                           transient workers
//!   │                  └─ Shutdown sentinel ─► break
//!   │                }
//!   ├─► join()       scan fleet, reap state < Joined, repeat until none
//!   └─► terminate()  request exit of every tracked process
//!
//! Signal path (SIGINT / SIGTERM):
//!   listener ─► sentinel on restart channel ─► SignalReceived event
//!            ─► cancel shutdown token
//!   monitor  ─► observes token ─► SIGTERM to every alive pid ─► break
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                        |
//! |-----------------|----------------------------------------------------------|-------------------------------------------|
//! | **Supervision** | Own, start, monitor, restart, and terminate the fleet.   | [`WorkerManager`], [`ManagerConfig`]       |
//! | **Processes**   | The consumed process contract and a command-backed impl. | [`ManagedProcess`], [`CommandSpec`]        |
//! | **Restart**     | Wire protocol + channel for live-reload triggers.        | [`RestartMessage`], [`restart_channel`]    |
//! | **Registry**    | Shared worker-state table with the supervisor pid.       | [`WorkerRegistry`], [`MAIN_REGISTRY_KEY`]  |
//! | **Observability**| Hook into lifecycle events (logging, metrics).          | [`Subscribe`], [`Event`], [`EventKind`]    |
//! | **Errors**      | Typed errors for the runtime and the process layer.      | [`SuperviseError`], [`ProcessError`]       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use procvisor::{
//!     restart_channel, CommandSpec, ManagerConfig, WorkerManager, WorkerRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = ManagerConfig::default();
//!
//!     // The settings blob shared by every transient worker; it doubles
//!     // as the process factory.
//!     let spec = CommandSpec::new("my-server")
//!         .arg("--listen")
//!         .arg("0.0.0.0:8000");
//!
//!     let (publisher, subscriber) = restart_channel();
//!     let registry = WorkerRegistry::new();
//!
//!     // Keep a publisher clone for external reload triggers
//!     // (e.g., a filesystem watcher).
//!     let reloader = publisher.clone();
//!
//!     let mut manager =
//!         WorkerManager::new(cfg, 2, &spec, (publisher, subscriber), registry);
//!
//!     // Later, from the watcher: restart one worker with a file hint.
//!     reloader.send_line("Worker-0:src/handlers.rs");
//!
//!     // Blocks until a signal or an external shutdown sentinel arrives.
//!     manager.run().await?;
//!     Ok(())
//! }
//! ```

mod channel;
mod config;
mod core;
mod error;
mod events;
mod process;
mod subscribers;

// ---- Public re-exports ----

pub use channel::{restart_channel, RestartMessage, RestartPublisher, RestartSubscriber, ALL_PROCESSES};
pub use config::ManagerConfig;
pub use crate::core::{TermSignal, WorkerInfo, WorkerManager, WorkerRegistry, MAIN_REGISTRY_KEY};
pub use error::{ProcessError, SuperviseError};
pub use events::{Bus, Event, EventKind};
pub use process::{
    CommandProcess, CommandSpec, FactoryFn, ManagedProcess, ProcessFactory, ProcessRef,
    ProcessState, Worker,
};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
