//! # Restart channel endpoints.
//!
//! [`restart_channel`] builds the publisher/subscriber pair that links an
//! external reload-trigger source (and the signal listener) to the
//! supervisor's monitor loop.
//!
//! ## Architecture
//! ```text
//! watcher ──(send_line / restart / restart_all)──┐
//!                                                ├──► mpsc ──► RestartSubscriber::poll
//! signal listener ──(shutdown sentinel)──────────┘              (in monitor loop)
//! ```
//!
//! ## Rules
//! - The publisher is cheap to clone; every clone feeds the same subscriber.
//! - Raw watcher lines are parsed at the boundary; the channel carries
//!   [`RestartMessage`] values only.
//! - Dropping every publisher closes the channel; the subscriber reports
//!   that as the shutdown sentinel (an absent peer cannot keep a fleet up).

use std::time::Duration;

use tokio::sync::mpsc;

use crate::channel::message::RestartMessage;

/// Creates a connected publisher/subscriber pair.
pub fn restart_channel() -> (RestartPublisher, RestartSubscriber) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RestartPublisher { tx }, RestartSubscriber { rx })
}

/// Sending side of the restart channel.
#[derive(Clone, Debug)]
pub struct RestartPublisher {
    tx: mpsc::UnboundedSender<RestartMessage>,
}

impl RestartPublisher {
    /// Parses a raw wire line and publishes the resulting record.
    ///
    /// The empty string publishes the shutdown sentinel.
    pub fn send_line(&self, line: &str) {
        let _ = self.tx.send(RestartMessage::parse(line));
    }

    /// Requests a restart of the named workers (`None` = all transient).
    pub fn restart(&self, names: Option<Vec<String>>, files: Vec<String>) {
        let _ = self.tx.send(RestartMessage::Restart { names, files });
    }

    /// Requests a restart of every transient worker.
    pub fn restart_all(&self, files: Vec<String>) {
        self.restart(None, files);
    }

    /// Publishes the shutdown sentinel.
    pub fn shutdown(&self) {
        let _ = self.tx.send(RestartMessage::Shutdown);
    }
}

/// Receiving side of the restart channel.
#[derive(Debug)]
pub struct RestartSubscriber {
    rx: mpsc::UnboundedReceiver<RestartMessage>,
}

impl RestartSubscriber {
    /// Waits up to `timeout` for the next record.
    ///
    /// Returns `None` when nothing arrived within the window. A closed
    /// channel (all publishers dropped) yields the shutdown sentinel.
    pub async fn poll(&mut self, timeout: Duration) -> Option<RestartMessage> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Err(_elapsed) => None,
            Ok(Some(message)) => Some(message),
            Ok(None) => Some(RestartMessage::Shutdown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn poll_times_out_when_idle() {
        let (_publisher, mut subscriber) = restart_channel();
        assert_eq!(subscriber.poll(POLL).await, None);
    }

    #[tokio::test]
    async fn records_arrive_in_order() {
        let (publisher, mut subscriber) = restart_channel();
        publisher.restart(Some(vec!["Worker-0".into()]), vec![]);
        publisher.shutdown();

        assert_eq!(
            subscriber.poll(POLL).await,
            Some(RestartMessage::Restart {
                names: Some(vec!["Worker-0".into()]),
                files: vec![],
            })
        );
        assert_eq!(subscriber.poll(POLL).await, Some(RestartMessage::Shutdown));
    }

    #[tokio::test]
    async fn closed_channel_reads_as_shutdown() {
        let (publisher, mut subscriber) = restart_channel();
        drop(publisher);
        assert_eq!(subscriber.poll(POLL).await, Some(RestartMessage::Shutdown));
    }

    #[tokio::test]
    async fn raw_lines_are_parsed_at_the_boundary() {
        let (publisher, mut subscriber) = restart_channel();
        publisher.send_line("__ALL_PROCESSES__:main.rs");

        assert_eq!(
            subscriber.poll(POLL).await,
            Some(RestartMessage::Restart {
                names: None,
                files: vec!["main.rs".into()],
            })
        );
    }
}
