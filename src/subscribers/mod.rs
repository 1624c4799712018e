//! # Event subscribers for the procvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and a built-in stdout
//! implementation for handling runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   WorkerManager ── publish(Event) ──► Bus ──► fan-out listener
//!                                                 │
//!                                            ┌────┴────┬────────┐
//!                                            ▼         ▼        ▼
//!                                        LogWriter  Metrics  Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```rust
//! use async_trait::async_trait;
//! use procvisor::{Event, EventKind, Subscribe};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::WorkerRestarted) {
//!             // increment a restart counter, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
