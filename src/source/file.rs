//! File-based data source.
//!
//! Replays captured endpoint payloads from JSON files on disk, for
//! inspecting a dump without a running backend. Each file is re-read when
//! its modification time changes, so pointing the files at live-updated
//! captures also works.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use super::{BansSnapshot, CycleEvent, FetchError, MetricsSnapshot, UpdateSource};

/// An [`UpdateSource`] that reads the two endpoint payloads from files.
///
/// The metrics file holds an `/api/history` body, the bans file an
/// `/api/bans-details` body. Parse and shape failures surface as failed
/// cycles, exactly as they would from the live backend.
#[derive(Debug)]
pub struct FileSource {
    metrics: TrackedFile,
    bans: TrackedFile,
    description: String,
    seq: u64,
}

/// One replay file plus the state needed to detect changes.
#[derive(Debug)]
struct TrackedFile {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    polled: bool,
}

impl TrackedFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            last_modified: None,
            polled: false,
        }
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Check whether the file changed since the last read; if so, read and
    /// parse it. Returns `None` when there is nothing new. A missing or
    /// unparsable file is reported once per change, not once per poll.
    fn poll<T: DeserializeOwned>(&mut self) -> Option<Result<T, FetchError>> {
        let current = self.modified_time();
        let changed = if !self.polled {
            true
        } else {
            match (&self.last_modified, &current) {
                (Some(last), Some(now)) => now > last,
                (None, Some(_)) => true, // file appeared after a failed poll
                _ => false,
            }
        };
        if !changed {
            return None;
        }
        self.polled = true;
        self.last_modified = current;

        let result = match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str::<T>(&content)
                .map_err(|e| FetchError::Decode(e.to_string())),
            Err(e) => Err(FetchError::Read(e.to_string())),
        };
        Some(result)
    }
}

impl FileSource {
    /// Create a file source for the given payload captures.
    pub fn new<P: AsRef<Path>>(metrics_path: P, bans_path: P) -> Self {
        let metrics_path = metrics_path.as_ref();
        let bans_path = bans_path.as_ref();
        let description = format!(
            "files: {}, {}",
            metrics_path.display(),
            bans_path.display()
        );
        Self {
            metrics: TrackedFile::new(metrics_path),
            bans: TrackedFile::new(bans_path),
            description,
            seq: 0,
        }
    }
}

impl UpdateSource for FileSource {
    fn poll(&mut self) -> Option<CycleEvent> {
        if let Some(result) = self.metrics.poll::<MetricsSnapshot>() {
            self.seq += 1;
            let result = result.and_then(|snapshot| {
                snapshot.validate()?;
                Ok(snapshot)
            });
            return Some(CycleEvent::Metrics {
                seq: self.seq,
                result,
            });
        }
        if let Some(result) = self.bans.poll::<BansSnapshot>() {
            self.seq += 1;
            return Some(CycleEvent::Bans {
                seq: self.seq,
                result,
            });
        }
        None
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn metrics_json() -> &'static str {
        r#"{
            "labels": ["2024-05-01 13:07:42"],
            "datasets": {
                "cpu_usage": [10.5], "ram_usage": [40.0],
                "net_sent": [1.5], "net_recv": [3.0]
            },
            "totals": {
                "avg_cpu": 10.5, "avg_ram": 40.0,
                "total_net_sent_MB": 1.5, "total_net_recv_MB": 3.0
            }
        }"#
    }

    fn bans_json() -> &'static str {
        r#"{
            "data": { "2024-05-01 09:01": { "ipv4": ["1.2.3.4"], "ipv6": [] } },
            "summary": { "total_ipv4": 1, "total_ipv6": 0 }
        }"#
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn file_source_replays_both_payloads_once() {
        let metrics = write_file(metrics_json());
        let bans = write_file(bans_json());
        let mut source = FileSource::new(metrics.path(), bans.path());

        let first = source.poll().unwrap();
        assert!(matches!(
            first,
            CycleEvent::Metrics { seq: 1, result: Ok(_) }
        ));
        let second = source.poll().unwrap();
        assert!(matches!(second, CycleEvent::Bans { seq: 2, result: Ok(_) }));

        // Unchanged files produce no further cycles.
        assert!(source.poll().is_none());
    }

    #[test]
    fn file_source_missing_file_reports_read_error() {
        let bans = write_file(bans_json());
        let mut source = FileSource::new(Path::new("/nonexistent/history.json"), bans.path());

        match source.poll().unwrap() {
            CycleEvent::Metrics { result, .. } => {
                assert!(matches!(result, Err(FetchError::Read(_))));
            }
            other => panic!("expected metrics cycle, got {:?}", other),
        }

        // The failure is reported once, not on every poll.
        assert!(matches!(source.poll(), Some(CycleEvent::Bans { .. })));
        assert!(source.poll().is_none());
    }

    #[test]
    fn file_source_invalid_json_reports_decode_error() {
        let metrics = write_file("not valid json");
        let bans = write_file(bans_json());
        let mut source = FileSource::new(metrics.path(), bans.path());

        match source.poll().unwrap() {
            CycleEvent::Metrics { result, .. } => {
                assert!(matches!(result, Err(FetchError::Decode(_))));
            }
            other => panic!("expected metrics cycle, got {:?}", other),
        }
    }

    #[test]
    fn file_source_misaligned_series_reports_shape_error() {
        let metrics = write_file(
            r#"{
                "labels": ["2024-05-01 13:07:42", "2024-05-01 13:08:42"],
                "datasets": {
                    "cpu_usage": [10.5], "ram_usage": [40.0, 41.0],
                    "net_sent": [1.5, 2.0], "net_recv": [3.0, 3.1]
                },
                "totals": {
                    "avg_cpu": 10.5, "avg_ram": 40.0,
                    "total_net_sent_MB": 1.5, "total_net_recv_MB": 3.0
                }
            }"#,
        );
        let bans = write_file(bans_json());
        let mut source = FileSource::new(metrics.path(), bans.path());

        match source.poll().unwrap() {
            CycleEvent::Metrics { result, .. } => {
                assert!(matches!(result, Err(FetchError::Shape(_))));
            }
            other => panic!("expected metrics cycle, got {:?}", other),
        }
    }

    #[test]
    fn file_source_description_names_both_files() {
        let metrics = write_file(metrics_json());
        let bans = write_file(bans_json());
        let source = FileSource::new(metrics.path(), bans.path());
        assert!(source.description().starts_with("files: "));
    }
}
