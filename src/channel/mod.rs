//! Restart channel: wire protocol and publisher/subscriber endpoints.
//!
//! The channel carries restart requests from an external trigger source
//! (typically a filesystem watcher) to the supervisor, and the shutdown
//! sentinel in the other direction of intent.
//!
//! ## Contents
//! - [`RestartMessage`] the structured record parsed from the text-line
//!   wire format at the channel boundary
//! - [`RestartPublisher`] / [`RestartSubscriber`] the endpoint pair built
//!   by [`restart_channel`]
//!
//! ## Quick reference
//! - **Publishers**: external watchers (`send_line`, `restart`,
//!   `restart_all`) and the signal listener (`shutdown`).
//! - **Consumer**: `WorkerManager::monitor`, which polls the subscriber
//!   with a short timeout and dispatches each record.

mod message;
mod pipe;

pub use message::{RestartMessage, ALL_PROCESSES};
pub use pipe::{restart_channel, RestartPublisher, RestartSubscriber};
