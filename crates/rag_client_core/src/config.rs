use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_PRIMARY_BASE: &str = "https://rag.example.com:8443";
pub const DEFAULT_FALLBACK_BASE: &str = "https://203.0.113.10:8443";
pub const HEALTH_PATH: &str = "/health";
pub const QUERY_PATH: &str = "/query";

/// Health checks are diagnostics and must give up well before a real query would.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DIAGNOSTIC_TIMEOUT: Duration = Duration::from_secs(3);
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(30);
pub const PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Payload shape used when posting a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestContract {
    /// `{ "query": ..., "global_search": true }`
    #[default]
    Structured,
    /// `{ "question": ... }`
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base address {address:?}: {reason}")]
    InvalidBase { address: String, reason: String },
    #[error("endpoint path {0:?} must start with '/'")]
    InvalidPath(String),
    #[error("probe timeout {probe:?} must be shorter than query timeout {query:?}")]
    ProbeTimeoutTooLong { probe: Duration, query: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub primary: String,
    pub fallback: Option<String>,
    pub health_path: String,
    pub query_path: String,
    pub probe_timeout: Duration,
    pub diagnostic_timeout: Duration,
    pub query_timeout: Duration,
    pub probe_interval: Duration,
    /// Origin the client itself is served from, if any.
    pub page_origin: Option<String>,
    pub contract: RequestContract,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_BASE.to_string(),
            fallback: Some(DEFAULT_FALLBACK_BASE.to_string()),
            health_path: HEALTH_PATH.to_string(),
            query_path: QUERY_PATH.to_string(),
            probe_timeout: PROBE_TIMEOUT,
            diagnostic_timeout: DIAGNOSTIC_TIMEOUT,
            query_timeout: QUERY_TIMEOUT,
            probe_interval: PROBE_INTERVAL,
            page_origin: None,
            contract: RequestContract::Structured,
        }
    }
}

impl EndpointConfig {
    pub fn with_bases(primary: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base(&self.primary)?;
        if let Some(fallback) = &self.fallback {
            validate_base(fallback)?;
        }
        for path in [&self.health_path, &self.query_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath(path.clone()));
            }
        }
        if self.probe_timeout >= self.query_timeout {
            return Err(ConfigError::ProbeTimeoutTooLong {
                probe: self.probe_timeout,
                query: self.query_timeout,
            });
        }
        Ok(())
    }

    pub fn health_url(&self, base: &str) -> String {
        join(base, &self.health_path)
    }

    pub fn query_url(&self, base: &str) -> String {
        join(base, &self.query_path)
    }

    /// True when a secure page would have to call an insecure base, which
    /// browsers refuse outright.
    pub fn is_mixed_content(&self, base: &str) -> bool {
        let page_secure = self
            .page_origin
            .as_deref()
            .is_some_and(|origin| scheme_of(origin).as_deref() == Some("https"));
        page_secure && scheme_of(base).as_deref() == Some("http")
    }

    /// Makes the fallback the primary; the old primary becomes the fallback.
    pub fn promote_fallback(&mut self) -> bool {
        match self.fallback.take() {
            Some(fallback) => {
                let previous = std::mem::replace(&mut self.primary, fallback);
                self.fallback = Some(previous);
                true
            }
            None => false,
        }
    }
}

fn validate_base(address: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(address).map_err(|err| ConfigError::InvalidBase {
        address: address.to_string(),
        reason: err.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidBase {
            address: address.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn scheme_of(address: &str) -> Option<String> {
    match Url::parse(address) {
        Ok(url) => Some(url.scheme().to_ascii_lowercase()),
        Err(_) => address
            .split_once("://")
            .map(|(scheme, _)| scheme.trim().to_ascii_lowercase()),
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
