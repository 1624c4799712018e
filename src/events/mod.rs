//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the worker manager and
//! its signal listener.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `WorkerManager` (lifecycle phases, restart dispatch)
//!   and the signal listener (`SignalReceived`).
//! - **Consumer**: the manager's fan-out listener, which forwards each
//!   event to every registered [`Subscribe`](crate::Subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
