use std::time::Duration;

use chrono::Utc;
use client_logging::{client_info, client_warn};
use rag_client_core::{Effect, Method, Msg, Reply, Request, RequestTag};
use rag_client_engine::{
    EngineEvent, EngineHandle, FileStore, HttpMethod, Outcome, TransportRequest, TransportSettings,
};

use super::persistence;

pub struct EffectRunner {
    engine: EngineHandle<RequestTag>,
    store: FileStore,
}

impl EffectRunner {
    pub fn new(store: FileStore) -> Self {
        Self {
            engine: EngineHandle::new(TransportSettings::default()),
            store,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send { tag, request } => {
                    client_info!(
                        "Send {:?} {:?} url={} timeout_ms={}",
                        tag,
                        request.method,
                        request.url,
                        request.timeout.as_millis()
                    );
                    self.engine.send(tag, map_request(request));
                }
                Effect::PersistHistory(entries) => {
                    persistence::save_history(&self.store, &entries);
                }
            }
        }
    }

    /// Next completed request as a core message, if one is ready.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }

    /// Like [`poll`](Self::poll), but blocks for up to `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn map_request(request: Request) -> TransportRequest {
    TransportRequest {
        method: match request.method {
            Method::Get => HttpMethod::Get,
            Method::Post => HttpMethod::Post,
        },
        url: request.url,
        body: request.body,
        timeout: request.timeout,
    }
}

fn map_event(event: EngineEvent<RequestTag>) -> Msg {
    match event {
        EngineEvent::Completed {
            tag,
            outcome,
            elapsed,
        } => {
            if !matches!(outcome, Outcome::Success { .. }) {
                client_warn!("{:?} failed after {} ms: {}", tag, elapsed.as_millis(), outcome);
            }
            let reply = map_outcome(outcome);
            match tag {
                RequestTag::Probe { probe_id, step } => Msg::ProbeReplied {
                    probe_id,
                    step,
                    reply,
                },
                RequestTag::Query => Msg::QueryReplied {
                    reply,
                    latency: elapsed,
                    completed_at: Utc::now(),
                },
            }
        }
    }
}

fn map_outcome(outcome: Outcome) -> Reply {
    match outcome {
        Outcome::Success { status, body } => Reply::Success { status, body },
        Outcome::Timeout => Reply::Timeout,
        Outcome::NetworkFailure { message } => Reply::NetworkFailure { message },
        Outcome::CrossOriginFailure { message } => Reply::CrossOriginFailure { message },
    }
}
