use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{EntryId, ProbeId, ProbeStep, QueryResult};

/// What came back from a single request, as classified by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A response arrived; `body` is `None` when it was not JSON.
    Success {
        status: u16,
        body: Option<serde_json::Value>,
    },
    Timeout,
    NetworkFailure { message: String },
    CrossOriginFailure { message: String },
}

impl Reply {
    pub(crate) fn is_success_status(&self) -> bool {
        matches!(self, Reply::Success { status, .. } if (200..300).contains(status))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the question text.
    QuestionChanged(String),
    /// User asked to submit the current question.
    QuerySubmitted,
    /// Startup, the periodic timer or the user asked for a connectivity check.
    ProbeRequested,
    /// Transport finished one step of a probe.
    ProbeReplied {
        probe_id: ProbeId,
        step: ProbeStep,
        reply: Reply,
    },
    /// Transport finished the outstanding query.
    QueryReplied {
        reply: Reply,
        latency: Duration,
        completed_at: DateTime<Utc>,
    },
    /// Restore history loaded from storage at startup.
    HistoryRestored(Vec<QueryResult>),
    /// User picked a past query to ask again.
    HistoryEntrySelected(EntryId),
    /// User cleared the history.
    HistoryCleared,
}
