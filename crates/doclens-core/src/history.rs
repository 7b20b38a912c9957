//! Recent-activity log of completed scans.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::ResultPayload;

/// Default number of entries the log keeps.
pub const DEFAULT_CAPACITY: usize = 5;

/// One completed scan as shown in the history tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub document_name: String,
    pub scanned_at: DateTime<Utc>,
    pub risk_score: f64,
    pub high_risk_count: usize,
}

impl HistoryEntry {
    /// Summarise a payload scanned at `scanned_at`.
    ///
    /// The id is the scan time in milliseconds since the epoch.
    pub fn from_payload(payload: &ResultPayload, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id: scanned_at.timestamp_millis().to_string(),
            document_name: payload.document_name.clone(),
            scanned_at,
            risk_score: payload.risk_score,
            high_risk_count: payload.high_risk_count(),
        }
    }
}

/// Bounded, most-recent-first list of scans.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl HistoryLog {
    /// A log holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, dropping the oldest entry when full.
    pub fn record(&mut self, entry: HistoryEntry) {
        debug!(document = %entry.document_name, "recording scan in history");
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mean risk score, `None` when nothing was scanned yet.
    pub fn average_score(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|e| e.risk_score).sum();
        Some(sum / self.entries.len() as f64)
    }

    /// Sum of high-risk findings over all kept entries.
    pub fn total_high_risk(&self) -> usize {
        self.entries.iter().map(|e| e.high_risk_count).sum()
    }

    /// Entries scanned within the seven days before `now`.
    pub fn scanned_this_week(&self, now: DateTime<Utc>) -> usize {
        let week_ago = now - Duration::days(7);
        self.entries
            .iter()
            .filter(|e| e.scanned_at >= week_ago)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, minute: u32, score: f64, high: usize) -> HistoryEntry {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap();
        HistoryEntry {
            id: at.timestamp_millis().to_string(),
            document_name: name.into(),
            scanned_at: at,
            risk_score: score,
            high_risk_count: high,
        }
    }

    #[test]
    fn never_exceeds_capacity_and_keeps_newest_first() {
        let mut log = HistoryLog::default();
        for i in 0..12u32 {
            log.record(entry(&format!("doc{i}"), i, 1.0, 0));
            assert!(log.len() <= 5);
        }
        let names: Vec<&str> = log.entries().map(|e| e.document_name.as_str()).collect();
        assert_eq!(names, vec!["doc11", "doc10", "doc9", "doc8", "doc7"]);
    }

    #[test]
    fn ordering_follows_insertion_not_timestamp() {
        let mut log = HistoryLog::default();
        log.record(entry("later", 30, 1.0, 0));
        log.record(entry("earlier", 10, 1.0, 0));
        let first = log.entries().next().unwrap();
        assert_eq!(first.document_name, "earlier");
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = HistoryLog::with_capacity(0);
        log.record(entry("a", 0, 1.0, 0));
        log.record(entry("b", 1, 1.0, 0));
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn aggregate_stats() {
        let mut log = HistoryLog::default();
        assert_eq!(log.average_score(), None);
        log.record(entry("a", 0, 8.2, 2));
        log.record(entry("b", 1, 2.1, 0));
        log.record(entry("c", 2, 6.5, 1));
        let avg = log.average_score().unwrap();
        assert!((avg - (8.2 + 2.1 + 6.5) / 3.0).abs() < 1e-9);
        assert_eq!(log.total_high_risk(), 3);
    }

    #[test]
    fn this_week_window() {
        let mut log = HistoryLog::default();
        log.record(entry("old", 0, 1.0, 0));
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(log.scanned_this_week(now), 0);
        let now = Utc.with_ymd_and_hms(2026, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(log.scanned_this_week(now), 1);
    }

    #[test]
    fn entry_from_payload_counts_high_risks() {
        let sample = crate::samples::find_sample("1").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let e = HistoryEntry::from_payload(&sample.result, at);
        assert_eq!(e.high_risk_count, 2);
        assert_eq!(e.risk_score, 8.2);
        assert_eq!(e.id, at.timestamp_millis().to_string());
    }
}
