//! Data source abstraction for receiving backend snapshots.
//!
//! This module provides a trait-based abstraction for receiving dashboard
//! data from various sources: live HTTP polling against the backend, file
//! replay of captured payloads, or an in-memory channel for embedding and
//! tests.

mod channel;
mod error;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use error::{FetchError, ShapeError};
pub use file::FileSource;
pub use http::{Fetcher, HttpSource};
pub use snapshot::{
    BanBucket, BansSnapshot, BansSummary, MetricsSeries, MetricsSnapshot, MetricsTotals,
};

use std::fmt::Debug;

/// The outcome of one fetch cycle, delivered from a source to the app.
///
/// `seq` is the source's monotonically increasing cycle number. A new tick
/// never cancels an in-flight fetch, so a slow cycle can complete after a
/// newer one; the app uses `seq` to discard such stale results instead of
/// letting them overwrite fresher data.
#[derive(Debug)]
pub enum CycleEvent {
    /// Result of a metrics cycle (`/api/history`).
    Metrics {
        seq: u64,
        result: Result<MetricsSnapshot, FetchError>,
    },
    /// Result of a bans cycle (`/api/bans-details`).
    Bans {
        seq: u64,
        result: Result<BansSnapshot, FetchError>,
    },
}

impl CycleEvent {
    /// The cycle number this event belongs to.
    pub fn seq(&self) -> u64 {
        match self {
            CycleEvent::Metrics { seq, .. } | CycleEvent::Bans { seq, .. } => *seq,
        }
    }
}

/// Trait for receiving dashboard data from various backends.
///
/// Implementations deliver [`CycleEvent`]s from different transports: HTTP
/// polling, file replay, or in-memory channels.
///
/// # Example
///
/// ```
/// use banwatch::{ChannelSource, UpdateSource};
///
/// let (tx, mut source) = ChannelSource::create("test");
/// assert!(source.poll().is_none());
/// ```
pub trait UpdateSource: Send + Debug {
    /// Poll for the next cycle result.
    ///
    /// Returns `Some(event)` if a cycle has completed since the last poll,
    /// `None` otherwise. This method must be non-blocking; it is called once
    /// per UI frame.
    fn poll(&mut self) -> Option<CycleEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Stop producing events and release any background resources.
    ///
    /// Normal operation never calls this mid-session; it exists so the
    /// refresh lifecycle is explicit and owners can tear a source down.
    fn stop(&mut self) {}
}
