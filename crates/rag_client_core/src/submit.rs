use std::time::Duration;

use chrono::{DateTime, Utc};
use client_logging::{client_info, client_warn};
use serde_json::json;

use crate::answer::synthesize_answer;
use crate::effect::Request;
use crate::state::PendingQuery;
use crate::{AppState, QueryError, QueryResult, Reply, RequestContract};

/// Checks the submission preconditions and, if they hold, marks the query as
/// in flight and returns the request to send.
pub fn begin_query(state: &mut AppState) -> Result<Request, QueryError> {
    let question = state.question.trim();
    if question.is_empty() {
        return Err(QueryError::InvalidInput);
    }
    if state.in_flight() {
        return Err(QueryError::Busy);
    }
    if !state.is_connected() {
        return Err(QueryError::NotConnected);
    }

    let question = question.to_string();
    let url = state.config.query_url(&state.config.primary);
    let body = query_payload(state.config.contract, &question);
    client_info!("Submitting query ({} chars) to {}", question.len(), url);
    state.pending = Some(PendingQuery { question });
    state.mark_dirty();
    Ok(Request::post(url, body, state.config.query_timeout))
}

/// Consumes the reply to the outstanding query. The in-flight flag is cleared
/// whatever the outcome; only a successful answer reaches the history.
pub fn complete_query(
    state: &mut AppState,
    reply: Reply,
    latency: Duration,
    completed_at: DateTime<Utc>,
) -> Result<QueryResult, QueryError> {
    let question = state
        .pending
        .take()
        .map(|pending| pending.question)
        .unwrap_or_default();
    state.mark_dirty();

    let answer = match reply {
        Reply::Success {
            status: 200..=299,
            body: Some(body),
        } => synthesize_answer(&body).map_err(|err| {
            client_warn!("Could not decode query response: {}", err);
            QueryError::MalformedResponse
        })?,
        Reply::Success {
            status: 200..=299,
            body: None,
        } => return Err(QueryError::MalformedResponse),
        Reply::Success { status, .. } => return Err(QueryError::ServerError(status)),
        Reply::Timeout => return Err(QueryError::Timeout),
        Reply::NetworkFailure { message } => return Err(QueryError::NetworkFailure(message)),
        Reply::CrossOriginFailure { message } => {
            return Err(QueryError::CrossOriginFailure(message))
        }
    };

    let result = QueryResult {
        id: state.history.next_id(),
        question,
        answer,
        latency,
        completed_at,
    };
    client_info!("Query answered in {} ms", latency.as_millis());
    state.history.push(result.clone());
    Ok(result)
}

fn query_payload(contract: RequestContract, question: &str) -> serde_json::Value {
    match contract {
        RequestContract::Structured => json!({ "query": question, "global_search": true }),
        RequestContract::Simple => json!({ "question": question }),
    }
}
