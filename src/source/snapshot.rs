//! Wire types for backend snapshots.
//!
//! These types match the JSON bodies served by the monitoring backend at
//! `/api/history` and `/api/bans-details`. They are the common format
//! between the backend producer and this dashboard consumer; every payload
//! is deserialized into them at the fetch boundary and shape-checked before
//! any chart is touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ShapeError;

/// One full payload from `/api/history`.
///
/// `labels` and every series in `datasets` are index-aligned, one entry per
/// sample, in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Timestamp strings, one per sample (`"YYYY-MM-DD HH:MM:SS"`).
    pub labels: Vec<String>,

    /// The raw series, each index-aligned to `labels`.
    pub datasets: MetricsSeries,

    /// Precomputed totals. Newer backends send these directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<MetricsTotals>,

    /// Fallback totals under the older `summary` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<MetricsTotals>,
}

/// The four metric series of a history snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSeries {
    /// CPU usage per sample, percent.
    pub cpu_usage: Vec<f64>,
    /// RAM usage per sample, percent.
    pub ram_usage: Vec<f64>,
    /// Bytes sent per sample, MB.
    pub net_sent: Vec<f64>,
    /// Bytes received per sample, MB.
    pub net_recv: Vec<f64>,
}

/// Summary totals for the metrics charts.
///
/// Whichever of `totals`/`summary` the backend sends is authoritative; the
/// client never recomputes these from the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTotals {
    /// Average CPU usage over the window, percent.
    pub avg_cpu: f64,
    /// Average RAM usage over the window, percent.
    pub avg_ram: f64,
    /// Total MB sent over the window.
    #[serde(rename = "total_net_sent_MB")]
    pub total_net_sent_mb: f64,
    /// Total MB received over the window.
    #[serde(rename = "total_net_recv_MB")]
    pub total_net_recv_mb: f64,
}

impl MetricsSnapshot {
    /// Check that every series is index-aligned with the labels.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let expected = self.labels.len();
        for (name, series) in [
            ("cpu_usage", &self.datasets.cpu_usage),
            ("ram_usage", &self.datasets.ram_usage),
            ("net_sent", &self.datasets.net_sent),
            ("net_recv", &self.datasets.net_recv),
        ] {
            if series.len() != expected {
                return Err(ShapeError::LengthMismatch {
                    name,
                    len: series.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// One full payload from `/api/bans-details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BansSnapshot {
    /// Blocked addresses grouped into minute buckets, keyed by bucket
    /// timestamp (`"YYYY-MM-DD HH:MM"`). The backend does not guarantee key
    /// order; the BTreeMap yields keys lexicographically, which for this
    /// fixed timestamp format equals chronological order.
    pub data: BTreeMap<String, BanBucket>,

    /// Opaque display counters supplied by the backend. Not cross-validated
    /// against the bucket contents.
    pub summary: BansSummary,
}

/// The raw blocked addresses of one minute bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanBucket {
    /// Blocked IPv4 addresses in this bucket. May be empty.
    #[serde(default)]
    pub ipv4: Vec<String>,
    /// Blocked IPv6 addresses in this bucket. May be empty.
    #[serde(default)]
    pub ipv6: Vec<String>,
}

/// Running totals for the bans chart legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BansSummary {
    pub total_ipv4: u64,
    pub total_ipv6: u64,
}
