//! Metrics snapshot transformation.

use crate::source::{MetricsSnapshot, MetricsTotals, ShapeError};

use super::short_label;

/// A chart-ready update derived from one metrics snapshot.
///
/// All series are index-aligned with `labels`; the constructor rejects any
/// snapshot for which that does not hold, so the charts never see a partial
/// or garbled update.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsUpdate {
    /// Display labels, truncated to `HH:MM`.
    pub labels: Vec<String>,
    /// CPU usage per sample, percent.
    pub cpu: Vec<f64>,
    /// RAM usage per sample, percent.
    pub ram: Vec<f64>,
    /// MB sent per sample.
    pub net_sent: Vec<f64>,
    /// MB received per sample.
    pub net_recv: Vec<f64>,
    /// Summary totals embedded into the chart legends.
    pub totals: MetricsTotals,
}

impl MetricsUpdate {
    /// Transform a raw snapshot into a chart-ready update.
    ///
    /// The backend's `totals` are taken as-is when present; otherwise the
    /// `summary` field is passed through verbatim. Nothing is recomputed
    /// from the series.
    pub fn from_snapshot(snapshot: MetricsSnapshot) -> Result<Self, ShapeError> {
        snapshot.validate()?;
        let totals = snapshot
            .totals
            .or(snapshot.summary)
            .ok_or(ShapeError::MissingTotals)?;
        let labels = snapshot.labels.iter().map(|t| short_label(t)).collect();
        Ok(Self {
            labels,
            cpu: snapshot.datasets.cpu_usage,
            ram: snapshot.datasets.ram_usage,
            net_sent: snapshot.datasets.net_sent,
            net_recv: snapshot.datasets.net_recv,
            totals,
        })
    }

    /// Number of samples in this update.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the backend window contained no samples. An empty update
    /// is valid and renders as an empty chart.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
