//! Connectivity probing.
//!
//! A probe is a short chain of requests:
//!
//! 1. `GET {primary}/health`. A 2xx answer means online.
//! 2. If that failed with a cross-origin signature, `POST {primary}/query` with a
//!    placeholder payload. Any sign the service was reached means online but
//!    degraded; otherwise the origin is blocked. Cross-origin policy belongs to
//!    the page/service pair, so the fallback address is not tried.
//! 3. On any other failure, `GET {fallback}/health`. Success promotes the
//!    fallback to primary for the rest of the session.
//!
//! Each request carries the probe id and step it belongs to, so replies from a
//! superseded probe are dropped.

use client_logging::{client_debug, client_info, client_warn};
use serde_json::json;

use crate::effect::{Request, RequestTag};
use crate::{AppState, ConnectivityStatus, Effect, ProbeFailure, Reply, RequestContract};

pub type ProbeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    Primary,
    Diagnostic,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ProbeTracker {
    last_id: ProbeId,
    pending: Option<(ProbeId, ProbeStep)>,
}

impl ProbeTracker {
    fn begin(&mut self) -> ProbeId {
        self.last_id += 1;
        self.pending = Some((self.last_id, ProbeStep::Primary));
        self.last_id
    }

    fn expects(&self, probe_id: ProbeId, step: ProbeStep) -> bool {
        self.pending == Some((probe_id, step))
    }

    fn advance(&mut self, step: ProbeStep) {
        if let Some((id, _)) = self.pending {
            self.pending = Some((id, step));
        }
    }

    fn finish(&mut self) {
        self.pending = None;
    }
}

/// Statuses the placeholder query may come back with when the service was reached.
const DIAGNOSTIC_ACCEPTED: [u16; 2] = [400, 422];

pub(crate) fn start_probe(state: &mut AppState) -> Vec<Effect> {
    if state.config.is_mixed_content(&state.config.primary) {
        client_warn!(
            "Secure page cannot call insecure address {}; not probing",
            state.config.primary
        );
        state.probes.finish();
        state.settle(ConnectivityStatus::Blocked, Some(ProbeFailure::MixedContent));
        return Vec::new();
    }

    let probe_id = state.probes.begin();
    state.status = ConnectivityStatus::Checking;
    state.mark_dirty();
    client_debug!("Probe {} checking {}", probe_id, state.config.primary);

    let url = state.config.health_url(&state.config.primary);
    vec![send(
        probe_id,
        ProbeStep::Primary,
        Request::get(url, state.config.probe_timeout),
    )]
}

pub(crate) fn apply_reply(
    state: &mut AppState,
    probe_id: ProbeId,
    step: ProbeStep,
    reply: Reply,
) -> Vec<Effect> {
    if !state.probes.expects(probe_id, step) {
        client_debug!("Ignoring stale probe reply id={} step={:?}", probe_id, step);
        return Vec::new();
    }

    match step {
        ProbeStep::Primary => on_primary(state, probe_id, reply),
        ProbeStep::Diagnostic => {
            on_diagnostic(state, &reply);
            Vec::new()
        }
        ProbeStep::Fallback => {
            on_fallback(state, &reply);
            Vec::new()
        }
    }
}

fn on_primary(state: &mut AppState, probe_id: ProbeId, reply: Reply) -> Vec<Effect> {
    if reply.is_success_status() {
        client_info!("Service online at {}", state.config.primary);
        state.probes.finish();
        state.via_fallback = false;
        state.settle(ConnectivityStatus::Online, None);
        return Vec::new();
    }

    if let Reply::CrossOriginFailure { message } = &reply {
        client_warn!("Health check blocked by cross-origin policy: {}", message);
        state.probes.advance(ProbeStep::Diagnostic);
        let url = state.config.query_url(&state.config.primary);
        let body = placeholder_payload(state.config.contract);
        return vec![send(
            probe_id,
            ProbeStep::Diagnostic,
            Request::post(url, body, state.config.diagnostic_timeout),
        )];
    }

    let failure = failure_of(&reply);
    client_warn!("Primary {} unreachable: {}", state.config.primary, failure);
    let fallback = state
        .config
        .fallback
        .clone()
        .filter(|fallback| !state.config.is_mixed_content(fallback));
    match fallback {
        Some(fallback) => {
            client_info!("Retrying health check against fallback {}", fallback);
            state.probes.advance(ProbeStep::Fallback);
            let url = state.config.health_url(&fallback);
            vec![send(
                probe_id,
                ProbeStep::Fallback,
                Request::get(url, state.config.probe_timeout),
            )]
        }
        None => {
            state.probes.finish();
            state.settle(ConnectivityStatus::Offline, Some(failure));
            Vec::new()
        }
    }
}

fn on_diagnostic(state: &mut AppState, reply: &Reply) {
    state.probes.finish();
    let reached = match reply {
        Reply::Success { status, .. } => {
            (200..300).contains(status) || DIAGNOSTIC_ACCEPTED.contains(status)
        }
        _ => false,
    };
    if reached {
        client_info!("Query path reachable although the health check is blocked");
        state.via_fallback = false;
        state.settle(ConnectivityStatus::OnlineDegraded, None);
    } else {
        client_warn!("Query path blocked as well; service unusable from this origin");
        state.settle(ConnectivityStatus::Blocked, Some(ProbeFailure::CrossOrigin));
    }
}

fn on_fallback(state: &mut AppState, reply: &Reply) {
    state.probes.finish();
    if reply.is_success_status() {
        state.config.promote_fallback();
        client_info!("Service online via fallback; using {}", state.config.primary);
        state.via_fallback = true;
        state.settle(ConnectivityStatus::Online, None);
    } else {
        let failure = failure_of(reply);
        client_warn!("Fallback unreachable as well: {}", failure);
        state.settle(ConnectivityStatus::Offline, Some(failure));
    }
}

fn failure_of(reply: &Reply) -> ProbeFailure {
    match reply {
        Reply::Success { status, .. } => ProbeFailure::HttpStatus(*status),
        Reply::Timeout => ProbeFailure::Timeout,
        Reply::NetworkFailure { .. } => ProbeFailure::Network,
        Reply::CrossOriginFailure { .. } => ProbeFailure::CrossOrigin,
    }
}

fn placeholder_payload(contract: RequestContract) -> serde_json::Value {
    match contract {
        RequestContract::Structured => json!({ "query": "test", "global_search": true }),
        RequestContract::Simple => json!({ "question": "test" }),
    }
}

fn send(probe_id: ProbeId, step: ProbeStep, request: Request) -> Effect {
    Effect::Send {
        tag: RequestTag::Probe { probe_id, step },
        request,
    }
}
