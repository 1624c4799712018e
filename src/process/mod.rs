//! Process layer: lifecycle states, the process contract, and workers.
//!
//! ## Contents
//! - [`ProcessState`] ordered lifecycle enum (the `Joined` threshold drives
//!   the manager's join phase)
//! - [`ManagedProcess`] the contract the supervisor consumes; it never
//!   inspects process internals beyond it
//! - [`ProcessFactory`] / [`FactoryFn`] the entry-point seam producing a
//!   fresh process per worker slot
//! - [`CommandSpec`] / [`CommandProcess`] the bundled implementation backed
//!   by `tokio::process`
//! - [`Worker`] a named unit owning an ordered, non-empty process list

mod command;
mod process;
mod state;
mod worker;

pub use command::{CommandProcess, CommandSpec};
pub use process::{FactoryFn, ManagedProcess, ProcessFactory, ProcessRef};
pub use state::ProcessState;
pub use worker::Worker;

pub(crate) use command::terminate_pid;
