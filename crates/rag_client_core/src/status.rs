use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityStatus {
    #[default]
    Unknown,
    Checking,
    Online,
    /// The query path works but the health check is blocked by cross-origin policy.
    OnlineDegraded,
    Blocked,
    Offline,
}

impl ConnectivityStatus {
    /// Whether queries may be submitted under this status.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Online | Self::OnlineDegraded)
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Checking => "checking",
            Self::Online => "online",
            Self::OnlineDegraded => "online-degraded",
            Self::Blocked => "blocked",
            Self::Offline => "offline",
        };
        f.write_str(label)
    }
}

/// Why the most recent probe settled on `Blocked` or `Offline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Secure page, insecure service address; no request was attempted.
    MixedContent,
    CrossOrigin,
    Timeout,
    Network,
    HttpStatus(u16),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedContent => write!(f, "secure page cannot reach an insecure address"),
            Self::CrossOrigin => write!(f, "blocked by cross-origin policy"),
            Self::Timeout => write!(f, "service did not respond in time"),
            Self::Network => write!(f, "network error (connection, TLS or DNS)"),
            Self::HttpStatus(code) => write!(f, "health check returned HTTP {code}"),
        }
    }
}
