use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// One bounded-duration HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

/// Classified result of a [`TransportRequest`]. Transport never returns raw errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A response arrived in time, whatever its status. `body` is `None` when
    /// the payload was empty or not JSON.
    Success {
        status: u16,
        body: Option<serde_json::Value>,
    },
    Timeout,
    NetworkFailure { message: String },
    CrossOriginFailure { message: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { status, .. } => write!(f, "http status {status}"),
            Outcome::Timeout => write!(f, "timeout"),
            Outcome::NetworkFailure { message } => write!(f, "network error: {message}"),
            Outcome::CrossOriginFailure { message } => {
                write!(f, "cross-origin failure: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent<T> {
    Completed {
        tag: T,
        outcome: Outcome,
        elapsed: Duration,
    },
}
