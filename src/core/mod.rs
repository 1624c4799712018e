//! Runtime core: the worker-manager hub and its collaborators.
//!
//! This module contains the embedded implementation of the procvisor
//! runtime. The public API from this module is [`WorkerManager`], which
//! drives the fleet lifecycle, plus the shared [`WorkerRegistry`] table.
//!
//! Internal modules:
//! - [`manager`]: the hub driving start / monitor / join / terminate;
//! - [`registry`]: the shared worker-state table;
//! - [`signals`]: cross-platform termination-signal handling.

mod manager;
mod registry;
mod signals;

pub use manager::WorkerManager;
pub use registry::{WorkerInfo, WorkerRegistry, MAIN_REGISTRY_KEY};
pub use signals::TermSignal;
