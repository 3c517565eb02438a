//! Application state and refresh-cycle reconciliation.

use std::time::Instant;

use crate::chart::{self, ChartId, ChartRegistry};
use crate::data::{BansUpdate, DetailIndex, MetricsUpdate};
use crate::source::{CycleEvent, FetchError, UpdateSource};
use crate::tooltip;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All three charts stacked.
    Overview,
    /// CPU/RAM and network charts, full height.
    System,
    /// Bans bar chart with the bucket detail panel.
    Bans,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::System,
            View::System => View::Bans,
            View::Bans => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Bans,
            View::System => View::Overview,
            View::Bans => View::System,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::System => "System",
            View::Bans => "Bans",
        }
    }
}

/// Main application state.
///
/// Owns the chart registry and the current detail index. Both are mutated
/// only here, on the UI thread, when a cycle result is applied; the
/// renderer reads them each frame.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    /// Whether the bucket detail popup is open on the bans chart.
    pub show_detail: bool,

    // Data source
    source: Box<dyn UpdateSource>,
    pub charts: ChartRegistry,
    /// Per-bucket raw addresses for the current bans cycle. Replaced whole
    /// when a newer cycle is applied, never mutated in place.
    pub details: DetailIndex,

    // Per-flow cycle guards: a result is applied only if its sequence
    // number is greater than the last applied one, so a slow fetch that
    // completes after a newer cycle cannot overwrite fresher data.
    last_metrics_seq: u64,
    last_bans_seq: u64,

    // Last failure per flow, shown in the status bar until the flow
    // recovers. Chart state is never touched on failure.
    pub metrics_error: Option<String>,
    pub bans_error: Option<String>,

    /// Selected bucket on the bans chart; stands in for the hover point.
    pub bucket_cursor: usize,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given source.
    pub fn new(source: Box<dyn UpdateSource>) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail: false,
            source,
            charts: ChartRegistry::new(),
            details: DetailIndex::default(),
            last_metrics_seq: 0,
            last_bans_seq: 0,
            metrics_error: None,
            bans_error: None,
            bucket_cursor: 0,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Drain completed cycles from the source and reconcile the charts.
    ///
    /// Each cycle is handled independently: a failed or stale cycle leaves
    /// every chart exactly as it was, and later cycles in the same drain
    /// are unaffected. Returns the number of cycles applied.
    pub fn poll_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.source.poll() {
            match event {
                CycleEvent::Metrics { seq, result } => {
                    if seq <= self.last_metrics_seq {
                        tracing::debug!(seq, "discarding stale metrics cycle");
                        continue;
                    }
                    match result.and_then(|snapshot| {
                        MetricsUpdate::from_snapshot(snapshot).map_err(FetchError::from)
                    }) {
                        Ok(update) => {
                            self.apply_metrics(seq, &update);
                            applied += 1;
                        }
                        Err(e) => {
                            tracing::warn!(seq, error = %e, "metrics cycle failed");
                            self.metrics_error = Some(e.to_string());
                        }
                    }
                }
                CycleEvent::Bans { seq, result } => {
                    if seq <= self.last_bans_seq {
                        tracing::debug!(seq, "discarding stale bans cycle");
                        continue;
                    }
                    match result.map(BansUpdate::from_snapshot) {
                        Ok(update) => {
                            self.apply_bans(seq, update);
                            applied += 1;
                        }
                        Err(e) => {
                            tracing::warn!(seq, error = %e, "bans cycle failed");
                            self.bans_error = Some(e.to_string());
                        }
                    }
                }
            }
        }
        applied
    }

    fn apply_metrics(&mut self, seq: u64, update: &MetricsUpdate) {
        self.charts.reconcile(ChartId::CpuRam, chart::cpu_ram_spec(update));
        self.charts.reconcile(ChartId::Network, chart::network_spec(update));
        self.last_metrics_seq = seq;
        self.metrics_error = None;
        tracing::debug!(seq, samples = update.len(), "metrics cycle applied");
    }

    fn apply_bans(&mut self, seq: u64, update: BansUpdate) {
        self.charts.reconcile(ChartId::Bans, chart::bans_spec(&update));
        // Swap the detail index whole; the tooltip only ever reads the
        // index belonging to the cycle the chart currently shows.
        self.details = update.details;
        self.last_bans_seq = seq;
        self.bans_error = None;
        if self.bucket_cursor >= self.details.len() {
            self.bucket_cursor = self.details.len().saturating_sub(1);
        }
        tracing::debug!(seq, buckets = self.details.len(), "bans cycle applied");
    }

    /// The tooltip body for the currently selected bucket.
    ///
    /// Uses the live bans chart's legend text, which embeds the latest
    /// summary totals.
    pub fn tooltip_lines(&self) -> Vec<String> {
        let (ipv4_legend, ipv6_legend) = match self.charts.get(ChartId::Bans) {
            Some(handle) if handle.datasets.len() >= 2 => (
                handle.datasets[0].legend.clone(),
                handle.datasets[1].legend.clone(),
            ),
            _ => ("IPv4 blocked".to_string(), "IPv6 blocked".to_string()),
        };
        tooltip::lines_at(&self.details, self.bucket_cursor, &ipv4_legend, &ipv6_legend)
    }

    /// Display label of the currently selected bucket, if any.
    pub fn bucket_label(&self) -> Option<&str> {
        self.charts
            .get(ChartId::Bans)
            .and_then(|h| h.labels.get(self.bucket_cursor))
            .map(String::as_str)
    }

    /// Move the bucket cursor left by `n`.
    pub fn cursor_left(&mut self, n: usize) {
        self.bucket_cursor = self.bucket_cursor.saturating_sub(n);
    }

    /// Move the bucket cursor right by `n`.
    pub fn cursor_right(&mut self, n: usize) {
        let max = self.details.len().saturating_sub(1);
        self.bucket_cursor = (self.bucket_cursor + n).min(max);
    }

    /// Jump to the first bucket.
    pub fn cursor_home(&mut self) {
        self.bucket_cursor = 0;
    }

    /// Jump to the last bucket.
    pub fn cursor_end(&mut self) {
        self.bucket_cursor = self.details.len().saturating_sub(1);
    }

    /// Toggle the bucket detail popup.
    pub fn toggle_detail(&mut self) {
        if !self.details.is_empty() || self.charts.is_live(ChartId::Bans) {
            self.show_detail = !self.show_detail;
        }
    }

    /// Close any open overlay; returns true if one was closed.
    pub fn close_overlay(&mut self) -> bool {
        if self.show_help {
            self.show_help = false;
            return true;
        }
        if self.show_detail {
            self.show_detail = false;
            return true;
        }
        false
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Signal the application to quit and tear the source down.
    pub fn quit(&mut self) {
        self.source.stop();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BansSnapshot, ChannelSource, MetricsSnapshot};
    use tokio::sync::mpsc::UnboundedSender;

    fn metrics_snapshot(labels: &[&str], cpu: &[f64]) -> MetricsSnapshot {
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        let series: Vec<f64> = cpu.to_vec();
        serde_json::from_value(serde_json::json!({
            "labels": labels,
            "datasets": {
                "cpu_usage": series,
                "ram_usage": series,
                "net_sent": series,
                "net_recv": series,
            },
            "totals": {
                "avg_cpu": 42.5, "avg_ram": 40.6,
                "total_net_sent_MB": 3.5, "total_net_recv_MB": 6.5
            }
        }))
        .unwrap()
    }

    fn bans_snapshot(json: serde_json::Value) -> BansSnapshot {
        serde_json::from_value(json).unwrap()
    }

    fn app_with_channel() -> (UnboundedSender<CycleEvent>, App) {
        let (tx, source) = ChannelSource::create("test");
        (tx, App::new(Box::new(source)))
    }

    fn send_metrics(tx: &UnboundedSender<CycleEvent>, seq: u64, snapshot: MetricsSnapshot) {
        tx.send(CycleEvent::Metrics {
            seq,
            result: Ok(snapshot),
        })
        .unwrap();
    }

    fn send_bans(tx: &UnboundedSender<CycleEvent>, seq: u64, snapshot: BansSnapshot) {
        tx.send(CycleEvent::Bans {
            seq,
            result: Ok(snapshot),
        })
        .unwrap();
    }

    fn default_bans() -> BansSnapshot {
        bans_snapshot(serde_json::json!({
            "data": {
                "2024-05-01 09:01": { "ipv4": ["1.2.3.4", "5.6.7.8"], "ipv6": [] },
                "2024-05-01 09:02": { "ipv4": [], "ipv6": [] }
            },
            "summary": { "total_ipv4": 2, "total_ipv6": 0 }
        }))
    }

    #[test]
    fn initial_load_brings_all_three_charts_live() {
        let (tx, mut app) = app_with_channel();
        send_metrics(&tx, 1, metrics_snapshot(&["2024-05-01 13:07:42"], &[10.0]));
        send_bans(&tx, 1, default_bans());

        assert_eq!(app.poll_updates(), 2);
        assert_eq!(app.charts.live_count(), 3);
        assert!(app.metrics_error.is_none());
        assert!(app.bans_error.is_none());
    }

    #[test]
    fn second_cycle_mutates_charts_in_place() {
        let (tx, mut app) = app_with_channel();
        send_metrics(&tx, 1, metrics_snapshot(&["2024-05-01 13:07:42"], &[10.0]));
        send_bans(&tx, 1, default_bans());
        app.poll_updates();

        send_metrics(
            &tx,
            2,
            metrics_snapshot(
                &["2024-05-01 13:07:42", "2024-05-01 13:08:42"],
                &[10.0, 20.0],
            ),
        );
        send_bans(&tx, 2, default_bans());
        app.poll_updates();

        assert_eq!(app.charts.live_count(), 3);
        let cpu_ram = app.charts.get(ChartId::CpuRam).unwrap();
        assert_eq!(cpu_ram.revision(), 1);
        assert_eq!(cpu_ram.labels, ["13:07", "13:08"]);
        assert_eq!(app.charts.get(ChartId::Bans).unwrap().revision(), 1);
    }

    #[test]
    fn shape_error_leaves_prior_chart_state_untouched() {
        let (tx, mut app) = app_with_channel();
        send_metrics(&tx, 1, metrics_snapshot(&["2024-05-01 13:07:42"], &[10.0]));
        app.poll_updates();

        // cpu_usage has 5 elements but labels has 6
        let mut bad = metrics_snapshot(
            &["a", "b", "c", "d", "e", "f"],
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        );
        bad.datasets.cpu_usage.pop();
        send_metrics(&tx, 2, bad);
        assert_eq!(app.poll_updates(), 0);

        let cpu_ram = app.charts.get(ChartId::CpuRam).unwrap();
        assert_eq!(cpu_ram.revision(), 0);
        assert_eq!(cpu_ram.labels, ["13:07"]);
        assert!(app.metrics_error.is_some());

        // The next good cycle recovers.
        send_metrics(&tx, 3, metrics_snapshot(&["2024-05-01 13:09:42"], &[30.0]));
        assert_eq!(app.poll_updates(), 1);
        assert!(app.metrics_error.is_none());
        assert_eq!(app.charts.get(ChartId::CpuRam).unwrap().labels, ["13:09"]);
    }

    #[test]
    fn fetch_error_is_isolated_per_flow() {
        let (tx, mut app) = app_with_channel();
        send_metrics(&tx, 1, metrics_snapshot(&["2024-05-01 13:07:42"], &[10.0]));
        tx.send(CycleEvent::Bans {
            seq: 1,
            result: Err(FetchError::Status(502)),
        })
        .unwrap();

        assert_eq!(app.poll_updates(), 1);
        assert!(app.charts.is_live(ChartId::CpuRam));
        assert!(app.charts.is_live(ChartId::Network));
        assert!(!app.charts.is_live(ChartId::Bans));
        assert!(app.bans_error.is_some());
        assert!(app.metrics_error.is_none());
    }

    #[test]
    fn stale_cycle_cannot_overwrite_newer_data() {
        let (tx, mut app) = app_with_channel();
        // Cycle 2 completes before cycle 1 (overlapping fetches).
        send_metrics(&tx, 2, metrics_snapshot(&["2024-05-01 13:08:42"], &[20.0]));
        send_metrics(&tx, 1, metrics_snapshot(&["2024-05-01 13:07:42"], &[10.0]));

        assert_eq!(app.poll_updates(), 1);
        let cpu_ram = app.charts.get(ChartId::CpuRam).unwrap();
        assert_eq!(cpu_ram.labels, ["13:08"]);
        assert_eq!(cpu_ram.datasets[0].values, [20.0]);
    }

    #[test]
    fn detail_index_is_swapped_per_cycle() {
        let (tx, mut app) = app_with_channel();
        send_bans(&tx, 1, default_bans());
        app.poll_updates();
        assert_eq!(app.details.len(), 2);
        assert_eq!(app.details.ipv4[0], ["1.2.3.4", "5.6.7.8"]);

        send_bans(
            &tx,
            2,
            bans_snapshot(serde_json::json!({
                "data": { "2024-05-01 09:03": { "ipv4": [], "ipv6": ["::1"] } },
                "summary": { "total_ipv4": 2, "total_ipv6": 1 }
            })),
        );
        app.poll_updates();
        assert_eq!(app.details.len(), 1);
        assert_eq!(app.details.ipv6[0], ["::1"]);
    }

    #[test]
    fn cursor_is_clamped_when_buckets_shrink() {
        let (tx, mut app) = app_with_channel();
        send_bans(&tx, 1, default_bans());
        app.poll_updates();
        app.cursor_end();
        assert_eq!(app.bucket_cursor, 1);

        send_bans(
            &tx,
            2,
            bans_snapshot(serde_json::json!({
                "data": { "2024-05-01 09:03": { "ipv4": [], "ipv6": [] } },
                "summary": { "total_ipv4": 0, "total_ipv6": 0 }
            })),
        );
        app.poll_updates();
        assert_eq!(app.bucket_cursor, 0);
    }

    #[test]
    fn tooltip_uses_live_legend_text() {
        let (tx, mut app) = app_with_channel();
        send_bans(&tx, 1, default_bans());
        app.poll_updates();
        app.cursor_home();

        let lines = app.tooltip_lines();
        assert_eq!(
            lines,
            ["IPv4 blocked (2):", "  • 1.2.3.4", "  • 5.6.7.8"]
        );

        app.cursor_right(1);
        assert_eq!(app.tooltip_lines(), [crate::tooltip::NO_BLOCKED_ADDRESSES]);
    }

    #[test]
    fn empty_bans_window_is_a_valid_empty_chart() {
        let (tx, mut app) = app_with_channel();
        send_bans(
            &tx,
            1,
            bans_snapshot(serde_json::json!({
                "data": {},
                "summary": { "total_ipv4": 0, "total_ipv6": 0 }
            })),
        );
        assert_eq!(app.poll_updates(), 1);
        assert!(app.charts.is_live(ChartId::Bans));
        assert!(app.charts.get(ChartId::Bans).unwrap().labels.is_empty());
        assert!(app.bans_error.is_none());
    }

    #[test]
    fn view_cycle_wraps_both_ways() {
        let (_tx, mut app) = app_with_channel();
        assert_eq!(app.current_view, View::Overview);
        app.next_view();
        assert_eq!(app.current_view, View::System);
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, View::Overview);
        app.prev_view();
        assert_eq!(app.current_view, View::Bans);
    }
}
