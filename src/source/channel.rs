//! Channel-based data source.
//!
//! Receives cycle results via an in-memory channel. This is useful for
//! embedding the dashboard in a host application that already has the
//! payloads, and for driving the app in tests without a network.

use tokio::sync::mpsc;

use super::{CycleEvent, UpdateSource};

/// An [`UpdateSource`] fed by a channel instead of a scheduler.
///
/// The producer decides when cycles happen and what sequence numbers they
/// carry; this source just hands the events through.
///
/// # Example
///
/// ```
/// use banwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<CycleEvent>,
    description: String,
}

impl ChannelSource {
    /// Create a channel pair for pushing cycle events to a source.
    ///
    /// Returns `(sender, source)` where the sender pushes events and the
    /// source is handed to the app.
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<CycleEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            receiver: rx,
            description: format!("channel: {}", source_description),
        };
        (tx, source)
    }
}

impl UpdateSource for ChannelSource {
    fn poll(&mut self) -> Option<CycleEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
