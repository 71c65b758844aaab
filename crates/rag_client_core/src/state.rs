use crate::probe::ProbeTracker;
use crate::view_model::{AppViewModel, HistoryRowView, ResponseView};
use crate::{ConnectivityStatus, EndpointConfig, History, ProbeFailure, QueryError};

/// The question captured when a query was sent; its presence is the in-flight flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingQuery {
    pub(crate) question: String,
}

/// All mutable state of one client session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) config: EndpointConfig,
    /// What the user sees, including `Checking` while a probe runs.
    pub(crate) status: ConnectivityStatus,
    /// Outcome of the last completed probe; gates submission.
    pub(crate) settled: ConnectivityStatus,
    pub(crate) probe_failure: Option<ProbeFailure>,
    pub(crate) via_fallback: bool,
    pub(crate) probes: ProbeTracker,
    pub(crate) pending: Option<PendingQuery>,
    pub(crate) history: History,
    pub(crate) question: String,
    pub(crate) response: Option<ResponseView>,
    pub(crate) notice: Option<QueryError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EndpointConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.settled.is_connected()
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status,
            probe_failure: self.probe_failure,
            via_fallback: self.via_fallback,
            active_base: self.config.primary.clone(),
            in_flight: self.in_flight(),
            can_submit: !self.question.trim().is_empty() && !self.in_flight(),
            question: self.question.clone(),
            response: self.response.clone(),
            notice: self.notice.clone(),
            history: self
                .history
                .entries()
                .iter()
                .map(|entry| HistoryRowView {
                    id: entry.id,
                    question: entry.question.clone(),
                    latency: entry.latency,
                    completed_at: entry.completed_at,
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Records the final classification of a probe.
    pub(crate) fn settle(&mut self, status: ConnectivityStatus, failure: Option<ProbeFailure>) {
        self.status = status;
        self.settled = status;
        self.probe_failure = failure;
        self.mark_dirty();
    }
}
