//! JSONL audit log of completed review cycles.
//!
//! Each report is serialized as a single JSON line with a `timestamp`,
//! appended via a buffered writer. The log is append-only across runs, so
//! the "re-run until clean" loop leaves an audit trail.

use council_domain::ConsensusReport;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL report log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlReportLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlReportLog {
    /// Open (or create) the log at the given path, appending to existing
    /// content. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create report log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open report log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Standard log location, `$XDG_DATA_HOME/config-council/reports.jsonl`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("config-council").join("reports.jsonl"))
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one report. Logging failures are warned about, never fatal.
    pub fn append(&self, report: &ConsensusReport) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let counts = report.severity_counts();

        let record = serde_json::json!({
            "timestamp": timestamp,
            "correlation_id": report.correlation_id,
            "verdict": report.verdict,
            "findings": report.findings.len(),
            "critical": counts.critical,
            "high": counts.high,
            "medium": counts.medium,
            "low": counts.low,
            "reviewers": report.reviewers,
        });

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush per record for crash safety, the log is append-only
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlReportLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Verdict;

    fn report(correlation_id: &str) -> ConsensusReport {
        ConsensusReport::new(correlation_id, Verdict::Pass, Vec::new(), Vec::new())
    }

    #[test]
    fn test_appends_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.jsonl");

        let log = JsonlReportLog::new(&path).unwrap();
        log.append(&report("review-1"));
        log.append(&report("review-2"));
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["verdict"], "pass");
            assert!(value["timestamp"].is_string());
        }
    }

    #[test]
    fn test_reopening_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.jsonl");

        JsonlReportLog::new(&path).unwrap().append(&report("review-1"));
        JsonlReportLog::new(&path).unwrap().append(&report("review-2"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("reports.jsonl");
        assert!(JsonlReportLog::new(&path).is_some());
        assert!(path.parent().unwrap().is_dir());
    }
}
