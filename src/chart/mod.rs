//! Chart state and reconciliation.
//!
//! Each logical chart is a long-lived [`ChartHandle`] owned by the
//! [`ChartRegistry`]. A handle is constructed exactly once, on the first
//! successful cycle for its chart, and every later cycle mutates its bound
//! series in place. Presentation configuration (chart kind, colours, tick
//! cap, axis scale) is fixed at construction and never recomputed; legend
//! text embeds the latest summary totals and is overwritten on every apply.
//!
//! The rendering layer reads handles each frame; it never creates or
//! replaces them.

use ratatui::style::Color;

use crate::data::{BansUpdate, MetricsUpdate};

/// Maximum number of x-axis tick labels shown per chart.
pub const TICK_LABEL_CAP: usize = 24;

/// Identifier of one logical chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartId {
    /// CPU and RAM usage, percent (line chart).
    CpuRam,
    /// Network traffic sent/received, MB (line chart).
    Network,
    /// Blocked addresses per minute bucket (bar chart).
    Bans,
}

impl ChartId {
    /// All chart ids, in display order.
    pub const ALL: [ChartId; 3] = [ChartId::CpuRam, ChartId::Network, ChartId::Bans];

    /// Returns the display title for this chart.
    pub fn title(&self) -> &'static str {
        match self {
            ChartId::CpuRam => "CPU / RAM",
            ChartId::Network => "Network",
            ChartId::Bans => "Blocked IPs",
        }
    }
}

/// How a chart's series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// Static presentation configuration, fixed at chart construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub kind: ChartKind,
    /// Cap on visible x-axis labels.
    pub tick_cap: usize,
    /// Fixed y-axis maximum; `None` scales to the data.
    pub y_max: Option<f64>,
}

/// One dataset of a chart update: legend text, colour, values.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSpec {
    pub legend: String,
    pub color: Color,
    pub values: Vec<f64>,
}

/// A full update for one chart: labels, datasets, presentation.
///
/// The presentation part is only honoured at construction; applying a spec
/// to a live chart takes its labels, values, and legend text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub style: ChartStyle,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetSpec>,
}

/// A dataset bound to a live chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundDataset {
    /// Legend text; embeds the latest summary totals, refreshed per apply.
    pub legend: String,
    /// Colour, fixed at construction.
    pub color: Color,
    /// Bound values, overwritten in place per apply.
    pub values: Vec<f64>,
}

/// Long-lived chart state bound to one mount point.
///
/// Created at most once per session; never destroyed during normal
/// operation.
#[derive(Debug, Clone)]
pub struct ChartHandle {
    style: ChartStyle,
    /// Bound display labels, overwritten per apply.
    pub labels: Vec<String>,
    /// Bound datasets, values and legends overwritten per apply.
    pub datasets: Vec<BoundDataset>,
    revision: u64,
}

impl ChartHandle {
    fn init(spec: ChartSpec) -> Self {
        Self {
            style: spec.style,
            labels: spec.labels,
            datasets: spec
                .datasets
                .into_iter()
                .map(|d| BoundDataset {
                    legend: d.legend,
                    color: d.color,
                    values: d.values,
                })
                .collect(),
            revision: 0,
        }
    }

    /// Overwrite the bound labels, values, and legend text, then request a
    /// redraw. Presentation configuration is untouched.
    fn apply(&mut self, spec: ChartSpec) {
        self.labels = spec.labels;
        for (bound, incoming) in self.datasets.iter_mut().zip(spec.datasets) {
            bound.legend = incoming.legend;
            bound.values = incoming.values;
        }
        self.revision += 1;
    }

    /// The fixed presentation configuration of this chart.
    pub fn style(&self) -> ChartStyle {
        self.style
    }

    /// Number of applies since construction. The renderer treats any bump
    /// as a redraw request.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owns one [`ChartHandle`] per logical chart, for the page session.
///
/// `reconcile` is the only write path: it constructs the handle on the
/// first update for a chart id and mutates it in place afterwards. There is
/// no operation that destroys a handle.
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    cpu_ram: Option<ChartHandle>,
    network: Option<ChartHandle>,
    bans: Option<ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, id: ChartId) -> &mut Option<ChartHandle> {
        match id {
            ChartId::CpuRam => &mut self.cpu_ram,
            ChartId::Network => &mut self.network,
            ChartId::Bans => &mut self.bans,
        }
    }

    /// Initialize or update the chart for `id`.
    ///
    /// An update with empty labels is accepted and renders as an empty
    /// chart; absence of data is not a failure.
    pub fn reconcile(&mut self, id: ChartId, spec: ChartSpec) {
        let slot = self.slot_mut(id);
        match slot {
            None => *slot = Some(ChartHandle::init(spec)),
            Some(handle) => handle.apply(spec),
        }
    }

    /// The live chart for `id`, if it has been initialized.
    pub fn get(&self, id: ChartId) -> Option<&ChartHandle> {
        match id {
            ChartId::CpuRam => self.cpu_ram.as_ref(),
            ChartId::Network => self.network.as_ref(),
            ChartId::Bans => self.bans.as_ref(),
        }
    }

    /// Whether the chart for `id` has been initialized.
    pub fn is_live(&self, id: ChartId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live charts.
    pub fn live_count(&self) -> usize {
        ChartId::ALL.iter().filter(|id| self.is_live(**id)).count()
    }
}

/// Build the CPU/RAM chart spec from a metrics update.
pub fn cpu_ram_spec(update: &MetricsUpdate) -> ChartSpec {
    ChartSpec {
        style: ChartStyle {
            kind: ChartKind::Line,
            tick_cap: TICK_LABEL_CAP,
            y_max: Some(100.0),
        },
        labels: update.labels.clone(),
        datasets: vec![
            DatasetSpec {
                legend: format!("CPU ({}% avg)", update.totals.avg_cpu),
                color: Color::Red,
                values: update.cpu.clone(),
            },
            DatasetSpec {
                legend: format!("RAM ({}% avg)", update.totals.avg_ram),
                color: Color::Blue,
                values: update.ram.clone(),
            },
        ],
    }
}

/// Build the network chart spec from a metrics update.
pub fn network_spec(update: &MetricsUpdate) -> ChartSpec {
    ChartSpec {
        style: ChartStyle {
            kind: ChartKind::Line,
            tick_cap: TICK_LABEL_CAP,
            y_max: None,
        },
        labels: update.labels.clone(),
        datasets: vec![
            DatasetSpec {
                legend: format!("Net sent ({} MB total)", update.totals.total_net_sent_mb),
                color: Color::Green,
                values: update.net_sent.clone(),
            },
            DatasetSpec {
                legend: format!("Net recv ({} MB total)", update.totals.total_net_recv_mb),
                color: Color::Yellow,
                values: update.net_recv.clone(),
            },
        ],
    }
}

/// Build the bans chart spec from a bans update.
pub fn bans_spec(update: &BansUpdate) -> ChartSpec {
    ChartSpec {
        style: ChartStyle {
            kind: ChartKind::Bar,
            tick_cap: TICK_LABEL_CAP,
            y_max: None,
        },
        labels: update.labels.clone(),
        datasets: vec![
            DatasetSpec {
                legend: format!("IPv4 blocked ({})", update.total_ipv4),
                color: Color::Red,
                values: update.ipv4_counts.iter().map(|&n| n as f64).collect(),
            },
            DatasetSpec {
                legend: format!("IPv6 blocked ({})", update.total_ipv6),
                color: Color::Cyan,
                values: update.ipv6_counts.iter().map(|&n| n as f64).collect(),
            },
        ],
    }
}
