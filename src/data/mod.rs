//! Data transformation for backend snapshots.
//!
//! This module turns raw wire snapshots into chart-ready updates:
//!
//! - [`metrics`]: normalizes a history snapshot into index-aligned series
//!   with display labels and summary totals
//! - [`bans`]: normalizes a bans snapshot into sorted count series plus the
//!   per-bucket [`DetailIndex`] consumed by the tooltip resolver
//!
//! ## Data flow
//!
//! ```text
//! MetricsSnapshot ──▶ MetricsUpdate ──▶ ChartRegistry (CpuRam, Network)
//! BansSnapshot ─────▶ BansUpdate ─────▶ ChartRegistry (Bans)
//!                          │
//!                          └──▶ DetailIndex ──▶ tooltip::resolve
//! ```

pub mod bans;
pub mod metrics;

pub use bans::{BansUpdate, DetailIndex};
pub use metrics::MetricsUpdate;

/// Truncate a backend timestamp to its `HH:MM` time-of-day component.
///
/// Timestamps arrive as `"YYYY-MM-DD HH:MM:SS"` (seconds optional for bans
/// bucket keys); the charts display only `HH:MM`. Pure and order-preserving.
pub fn short_label(timestamp: &str) -> String {
    let time = timestamp
        .split_once(' ')
        .map(|(_, time)| time)
        .unwrap_or(timestamp);
    time.chars().take(5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_label_drops_date_and_seconds() {
        assert_eq!(short_label("2024-05-01 13:07:42"), "13:07");
    }

    #[test]
    fn short_label_accepts_minute_bucket_keys() {
        assert_eq!(short_label("2024-05-01 09:01"), "09:01");
    }

    #[test]
    fn short_label_passes_through_bare_times() {
        assert_eq!(short_label("13:07:42"), "13:07");
        assert_eq!(short_label("13:07"), "13:07");
    }
}
