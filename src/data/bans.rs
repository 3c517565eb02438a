//! Bans snapshot transformation.

use crate::source::BansSnapshot;

use super::short_label;

/// Per-bucket raw address lists, index-aligned with the sorted buckets.
///
/// Rebuilt whole on every bans cycle and swapped into the app atomically;
/// the tooltip resolver only ever reads the current cycle's index, never a
/// half-updated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailIndex {
    /// IPv4 addresses of bucket `i` at position `i`.
    pub ipv4: Vec<Vec<String>>,
    /// IPv6 addresses of bucket `i` at position `i`.
    pub ipv6: Vec<Vec<String>>,
}

impl DetailIndex {
    /// Number of buckets covered by this index.
    pub fn len(&self) -> usize {
        self.ipv4.len()
    }

    /// True when the snapshot contained no buckets.
    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty()
    }
}

/// A chart-ready update derived from one bans snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BansUpdate {
    /// Display labels per bucket, truncated to `HH:MM`, chronological.
    pub labels: Vec<String>,
    /// Blocked IPv4 count per bucket.
    pub ipv4_counts: Vec<u64>,
    /// Blocked IPv6 count per bucket.
    pub ipv6_counts: Vec<u64>,
    /// Raw contributing addresses per bucket, for tooltip reconstruction.
    pub details: DetailIndex,
    /// Display counter for the IPv4 legend.
    pub total_ipv4: u64,
    /// Display counter for the IPv6 legend.
    pub total_ipv6: u64,
}

impl BansUpdate {
    /// Transform a raw snapshot into sorted, index-aligned series.
    ///
    /// Buckets are visited in ascending key order (lexicographic, which for
    /// the fixed timestamp format is chronological). A bucket with zero
    /// members in a category is valid: count 0, empty detail list.
    pub fn from_snapshot(snapshot: BansSnapshot) -> Self {
        let mut labels = Vec::with_capacity(snapshot.data.len());
        let mut ipv4_counts = Vec::with_capacity(snapshot.data.len());
        let mut ipv6_counts = Vec::with_capacity(snapshot.data.len());
        let mut details = DetailIndex::default();

        for (bucket_key, bucket) in snapshot.data {
            labels.push(short_label(&bucket_key));
            ipv4_counts.push(bucket.ipv4.len() as u64);
            ipv6_counts.push(bucket.ipv6.len() as u64);
            details.ipv4.push(bucket.ipv4);
            details.ipv6.push(bucket.ipv6);
        }

        Self {
            labels,
            ipv4_counts,
            ipv6_counts,
            details,
            total_ipv4: snapshot.summary.total_ipv4,
            total_ipv6: snapshot.summary.total_ipv6,
        }
    }

    /// Number of buckets in this update.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the snapshot contained no buckets.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BansSnapshot;

    fn snapshot(json: &str) -> BansSnapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn buckets_are_sorted_chronologically() {
        let update = BansUpdate::from_snapshot(snapshot(
            r#"{
                "data": {
                    "2024-05-01 09:02": { "ipv4": ["5.6.7.8"], "ipv6": [] },
                    "2024-05-01 09:01": { "ipv4": ["1.2.3.4"], "ipv6": [] }
                },
                "summary": { "total_ipv4": 2, "total_ipv6": 0 }
            }"#,
        ));
        assert_eq!(update.labels, ["09:01", "09:02"]);
        assert_eq!(update.details.ipv4[0], ["1.2.3.4"]);
        assert_eq!(update.details.ipv4[1], ["5.6.7.8"]);
    }

    #[test]
    fn counts_and_details_are_index_aligned() {
        let update = BansUpdate::from_snapshot(snapshot(
            r#"{
                "data": {
                    "2024-05-01 09:01": {
                        "ipv4": ["1.2.3.4", "5.6.7.8"],
                        "ipv6": ["2001:db8::1"]
                    },
                    "2024-05-01 09:02": { "ipv4": [], "ipv6": [] }
                },
                "summary": { "total_ipv4": 2, "total_ipv6": 1 }
            }"#,
        ));
        assert_eq!(update.ipv4_counts, [2, 0]);
        assert_eq!(update.ipv6_counts, [1, 0]);
        assert_eq!(update.details.ipv4[0].len(), 2);
        assert_eq!(update.details.ipv6[0].len(), 1);
        assert_eq!(update.details.len(), update.len());
    }

    #[test]
    fn empty_buckets_are_valid() {
        let update = BansUpdate::from_snapshot(snapshot(
            r#"{
                "data": { "2024-05-01 09:01": { "ipv4": [], "ipv6": [] } },
                "summary": { "total_ipv4": 0, "total_ipv6": 0 }
            }"#,
        ));
        assert_eq!(update.ipv4_counts, [0]);
        assert!(update.details.ipv4[0].is_empty());
    }

    #[test]
    fn summary_totals_pass_through() {
        // Opaque display counters: no cross-validation against buckets.
        let update = BansUpdate::from_snapshot(snapshot(
            r#"{
                "data": {},
                "summary": { "total_ipv4": 17, "total_ipv6": 3 }
            }"#,
        ));
        assert!(update.is_empty());
        assert_eq!(update.total_ipv4, 17);
        assert_eq!(update.total_ipv6, 3);
    }
}
