//! Deciding whether a failed request was blocked by cross-origin policy.
//!
//! Platforms do not report this as a distinct error kind, so the decision is a
//! heuristic over the failure text. It is injected into the transport as a
//! closure so a host with better information can replace it.

use std::sync::Arc;

/// What is known about a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureSignature<'a> {
    /// Error text including its source chain.
    pub message: &'a str,
    /// HTTP status, if the failure happened after one was received.
    pub status: Option<u16>,
}

pub type CrossOriginClassifier = Arc<dyn Fn(&FailureSignature<'_>) -> bool + Send + Sync>;

const CROSS_ORIGIN_MARKERS: [&str; 5] = [
    "cors",
    "cross-origin",
    "access-control-allow-origin",
    "failed to fetch",
    "networkerror when attempting to fetch",
];

/// Matches the error texts browsers produce for blocked cross-origin requests.
/// A failure that carries a status code is never cross-origin.
pub fn default_cross_origin_classifier(signature: &FailureSignature<'_>) -> bool {
    if signature.status.is_some() {
        return false;
    }
    let message = signature.message.to_ascii_lowercase();
    CROSS_ORIGIN_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

pub fn default_classifier() -> CrossOriginClassifier {
    Arc::new(default_cross_origin_classifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: &str, status: Option<u16>) -> bool {
        default_cross_origin_classifier(&FailureSignature { message, status })
    }

    #[test]
    fn browser_fetch_failures_are_cross_origin() {
        assert!(classify("TypeError: Failed to fetch", None));
        assert!(classify(
            "NetworkError when attempting to fetch resource.",
            None
        ));
        assert!(classify("blocked by CORS policy", None));
    }

    #[test]
    fn connection_errors_are_not_cross_origin() {
        assert!(!classify(
            "error sending request for url (https://x/health): connection refused",
            None
        ));
        assert!(!classify("dns error: failed to lookup address", None));
    }

    #[test]
    fn status_code_rules_out_cross_origin() {
        assert!(!classify("CORS", Some(403)));
    }
}
