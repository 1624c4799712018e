//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], an extension point for plugging custom event
//! handlers into the runtime (logging, metrics, alerting).
//!
//! Subscribers are registered on the manager before `run()` and invoked
//! sequentially from a dedicated fan-out task, in event order.
//!
//! ## Rules
//! - Use async I/O; avoid blocking the executor.
//! - Handle errors internally; do not panic.
//! - A slow subscriber delays the fan-out task, not the publishers.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the manager's fan-out task, not in publisher context.
    /// Events are delivered in publish order.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit"). The
    /// default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
