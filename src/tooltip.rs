//! Tooltip detail reconstruction.
//!
//! Given a hovered bucket, rebuilds the list of raw blocked addresses that
//! contributed to the aggregated data point. Pure functions over the
//! current cycle's [`DetailIndex`]; the app swaps that index atomically per
//! cycle, so a resolver call never observes a half-updated one.

use crate::data::DetailIndex;

/// Sentinel line shown when no series at the hover point has any members.
pub const NO_BLOCKED_ADDRESSES: &str = "No blocked addresses";

/// Which bans series a hover line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanSeries {
    Ipv4,
    Ipv6,
}

/// Resolve the detail lines for one series at one bucket.
///
/// Returns the series legend followed by one `"  • <address>"` line per
/// member; an empty detail list contributes no lines at all.
pub fn resolve(
    details: &DetailIndex,
    bucket: usize,
    series: BanSeries,
    legend: &str,
) -> Vec<String> {
    let list = match series {
        BanSeries::Ipv4 => details.ipv4.get(bucket),
        BanSeries::Ipv6 => details.ipv6.get(bucket),
    };
    match list {
        Some(addresses) if !addresses.is_empty() => {
            let mut lines = Vec::with_capacity(addresses.len() + 1);
            lines.push(format!("{}:", legend));
            lines.extend(addresses.iter().map(|addr| format!("  • {}", addr)));
            lines
        }
        _ => Vec::new(),
    }
}

/// Resolve the full tooltip body for a hovered bucket: both series in
/// dataset order, or the sentinel when neither contributes a line.
pub fn lines_at(
    details: &DetailIndex,
    bucket: usize,
    ipv4_legend: &str,
    ipv6_legend: &str,
) -> Vec<String> {
    let mut lines = resolve(details, bucket, BanSeries::Ipv4, ipv4_legend);
    lines.extend(resolve(details, bucket, BanSeries::Ipv6, ipv6_legend));
    if lines.is_empty() {
        lines.push(NO_BLOCKED_ADDRESSES.to_string());
    }
    lines
}
