use std::time::Duration;

use crate::{ProbeId, ProbeStep, QueryResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue one HTTP request; the reply comes back tagged with `tag`.
    Send { tag: RequestTag, request: Request },
    /// Write the full history to durable storage.
    PersistHistory(Vec<QueryResult>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTag {
    Probe { probe_id: ProbeId, step: ProbeStep },
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl Request {
    pub(crate) fn get(url: String, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
            timeout,
        }
    }

    pub(crate) fn post(url: String, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: Method::Post,
            url,
            body: Some(body),
            timeout,
        }
    }
}
