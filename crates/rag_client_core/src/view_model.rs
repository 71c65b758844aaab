use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{ConnectivityStatus, EntryId, ProbeFailure, QueryError, QueryResult};

/// Outcome of the last query that was actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseView {
    Answered(QueryResult),
    Failed(QueryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: ConnectivityStatus,
    pub probe_failure: Option<ProbeFailure>,
    pub via_fallback: bool,
    pub active_base: String,
    pub in_flight: bool,
    pub can_submit: bool,
    pub question: String,
    pub response: Option<ResponseView>,
    /// A submission rejected before any request was sent.
    pub notice: Option<QueryError>,
    pub history: Vec<HistoryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub id: EntryId,
    pub question: String,
    pub latency: Duration,
    pub completed_at: DateTime<Utc>,
}
