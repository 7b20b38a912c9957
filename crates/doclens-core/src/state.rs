//! Session state and its reducer.
//!
//! All state changes go through [`reduce`]: it takes the current
//! [`AppState`] by value and returns the next one. Nothing else mutates it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::document::{FileHandle, ResultPayload};
use crate::history::{HistoryEntry, HistoryLog};

/// Top-level navigation tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Upload,
    Demo,
    History,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Demo => "demo",
            Self::History => "history",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" => Some(Self::Upload),
            "demo" => Some(Self::Demo),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

/// Progress of the pending analysis, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    /// The last analysis failed; the message is shown until the next action.
    Failed(String),
}

/// The result currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Presented {
    pub payload: Arc<ResultPayload>,
    /// `true` plays the reveal ceremony, `false` shows everything at once.
    pub animate: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub tab: Tab,
    pub upload: Option<FileHandle>,
    pub phase: Phase,
    pub current: Option<Presented>,
    pub history: HistoryLog,
}

impl AppState {
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            history: HistoryLog::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectTab(Tab),
    /// An accepted file was picked. Clears the current result.
    FileSelected(FileHandle),
    /// Analysis of the selected file began.
    ScanStarted,
    ScanSucceeded {
        payload: Arc<ResultPayload>,
        at: DateTime<Utc>,
    },
    ScanFailed(String),
    /// A catalog sample was chosen. Clears the selected file; not recorded in history.
    SampleSelected {
        payload: Arc<ResultPayload>,
        animate: bool,
    },
    ClearResult,
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    debug!(?action, "reducing");
    match action {
        Action::SelectTab(tab) => {
            state.tab = tab;
        }
        Action::FileSelected(file) => {
            state.upload = Some(file);
            state.current = None;
            state.phase = Phase::Idle;
        }
        Action::ScanStarted => {
            if state.upload.is_none() || state.is_analyzing() {
                return state;
            }
            state.phase = Phase::Analyzing;
            if let Some(current) = state.current.as_mut() {
                current.animate = false;
            }
        }
        Action::ScanSucceeded { payload, at } => {
            if !state.is_analyzing() {
                return state;
            }
            let entry = HistoryEntry::from_payload(&payload, at);
            info!(
                document = %entry.document_name,
                score = entry.risk_score,
                high_risks = entry.high_risk_count,
                "scan completed"
            );
            state.history.record(entry);
            state.current = Some(Presented {
                payload,
                animate: true,
            });
            state.phase = Phase::Idle;
        }
        Action::ScanFailed(message) => {
            if !state.is_analyzing() {
                return state;
            }
            state.phase = Phase::Failed(message);
        }
        Action::SampleSelected { payload, animate } => {
            state.current = Some(Presented { payload, animate });
            state.upload = None;
            state.phase = Phase::Idle;
        }
        Action::ClearResult => {
            state.current = None;
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::find_sample;
    use chrono::TimeZone;

    fn sample(query: &str) -> Arc<ResultPayload> {
        Arc::new(find_sample(query).unwrap().result)
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap()
    }

    fn scanned(state: AppState, name: &str, minute: u32) -> AppState {
        let state = reduce(state, Action::FileSelected(FileHandle::new(name, 1024)));
        let state = reduce(state, Action::ScanStarted);
        let mut payload = (*sample("2")).clone();
        payload.document_name = name.to_string();
        reduce(
            state,
            Action::ScanSucceeded {
                payload: Arc::new(payload),
                at: at(minute),
            },
        )
    }

    #[test]
    fn default_state_is_idle_on_upload_tab() {
        let state = AppState::default();
        assert_eq!(state.tab, Tab::Upload);
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.current.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn scan_without_file_is_a_noop() {
        let state = reduce(AppState::default(), Action::ScanStarted);
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn successful_scan_records_history_and_animates() {
        let state = scanned(AppState::default(), "deal.pdf", 0);
        assert_eq!(state.phase, Phase::Idle);
        let current = state.current.as_ref().unwrap();
        assert!(current.animate);
        assert_eq!(current.payload.document_name, "deal.pdf");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.upload.as_ref().unwrap().name, "deal.pdf");
    }

    #[test]
    fn failure_keeps_previous_result_and_history() {
        let state = scanned(AppState::default(), "first.pdf", 0);
        let state = reduce(state, Action::ScanStarted);
        assert!(state.is_analyzing());
        let state = reduce(state, Action::ScanFailed("backend timed out".into()));

        assert_eq!(state.phase, Phase::Failed("backend timed out".into()));
        assert_eq!(
            state.current.as_ref().unwrap().payload.document_name,
            "first.pdf"
        );
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn late_success_after_reset_is_ignored() {
        let state = reduce(
            AppState::default(),
            Action::FileSelected(FileHandle::new("x.pdf", 1)),
        );
        let state = reduce(
            state,
            Action::ScanSucceeded {
                payload: sample("1"),
                at: at(0),
            },
        );
        assert!(state.current.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn sample_selection_clears_upload_and_skips_history() {
        let state = reduce(
            AppState::default(),
            Action::FileSelected(FileHandle::new("x.pdf", 1)),
        );
        let state = reduce(
            state,
            Action::SampleSelected {
                payload: sample("3"),
                animate: false,
            },
        );
        assert!(state.upload.is_none());
        assert!(state.history.is_empty());
        let current = state.current.unwrap();
        assert!(!current.animate);
        assert_eq!(current.payload.risk_score, 2.1);
    }

    #[test]
    fn selecting_a_file_clears_the_result() {
        let state = reduce(
            AppState::default(),
            Action::SampleSelected {
                payload: sample("1"),
                animate: true,
            },
        );
        let state = reduce(state, Action::FileSelected(FileHandle::new("y.docx", 10)));
        assert!(state.current.is_none());
    }

    #[test]
    fn history_stays_capped_across_many_scans() {
        let mut state = AppState::default();
        for minute in 0..8 {
            state = scanned(state, &format!("doc{minute}.pdf"), minute);
        }
        assert_eq!(state.history.len(), 5);
        assert_eq!(
            state.history.entries().next().unwrap().document_name,
            "doc7.pdf"
        );
    }

    #[test]
    fn tab_round_trip() {
        for tab in [Tab::Upload, Tab::Demo, Tab::History] {
            assert_eq!(Tab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(Tab::parse("Settings"), None);
        let state = reduce(AppState::default(), Action::SelectTab(Tab::History));
        assert_eq!(state.tab, Tab::History);
    }
}
