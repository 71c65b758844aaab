use std::error::Error as StdError;
use std::time::Duration;

use client_logging::{client_debug, client_trace};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::classify::{default_classifier, CrossOriginClassifier, FailureSignature};
use crate::{HttpMethod, Outcome, TransportRequest};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            max_body_bytes: 2 * 1024 * 1024,
            user_agent: format!("rag-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request and classifies how it ended. Never panics or
    /// returns a raw error; every failure maps to an [`Outcome`] variant.
    async fn send(&self, request: &TransportRequest) -> Outcome;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    classifier: CrossOriginClassifier,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Self {
        Self::with_classifier(settings, default_classifier())
    }

    pub fn with_classifier(settings: TransportSettings, classifier: CrossOriginClassifier) -> Self {
        Self {
            settings,
            classifier,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, Outcome> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .user_agent(self.settings.user_agent.clone())
            .build()
            .map_err(|err| self.classify_error(&err))
    }

    fn classify_error(&self, err: &reqwest::Error) -> Outcome {
        if err.is_timeout() {
            return Outcome::Timeout;
        }
        let message = error_chain(err);
        let signature = FailureSignature {
            message: &message,
            status: err.status().map(|status| status.as_u16()),
        };
        if (self.classifier)(&signature) {
            Outcome::CrossOriginFailure { message }
        } else {
            Outcome::NetworkFailure { message }
        }
    }

    async fn exchange(&self, request: &TransportRequest) -> Result<Outcome, Outcome> {
        let url = reqwest::Url::parse(&request.url).map_err(|err| Outcome::NetworkFailure {
            message: format!("invalid url {}: {err}", request.url),
        })?;
        let client = self.build_client()?;

        let mut builder = match request.method {
            HttpMethod::Get => client.get(url),
            HttpMethod::Post => client.post(url),
        }
        .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            let payload = serde_json::to_vec(body).map_err(|err| Outcome::NetworkFailure {
                message: format!("could not encode request body: {err}"),
            })?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.classify_error(&err))?;
        let status = response.status().as_u16();

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_body_bytes {
                return Err(too_large(self.settings.max_body_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| self.classify_error(&err))?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_body_bytes {
                return Err(too_large(self.settings.max_body_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    client_debug!("Response from {} is not JSON: {}", request.url, err);
                    None
                }
            }
        };
        Ok(Outcome::Success { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Outcome {
        client_trace!(
            "{} {} (timeout {:?})",
            request.method,
            request.url,
            request.timeout
        );
        // Dropping the exchange future on expiry aborts the request.
        match tokio::time::timeout(request.timeout, self.exchange(request)).await {
            Ok(Ok(outcome)) | Ok(Err(outcome)) => outcome,
            Err(_) => Outcome::Timeout,
        }
    }
}

fn too_large(max: u64, actual: u64) -> Outcome {
    Outcome::NetworkFailure {
        message: format!("response too large (max {max}, actual {actual})"),
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
