use thiserror::Error;

/// Why a question did not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("question is empty")]
    InvalidInput,
    #[error("not connected to the query service")]
    NotConnected,
    #[error("a query is already in progress")]
    Busy,
    #[error("query timed out")]
    Timeout,
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("request blocked by cross-origin policy: {0}")]
    CrossOriginFailure(String),
    #[error("service answered with HTTP {0}")]
    ServerError(u16),
    #[error("service answered with an unreadable body")]
    MalformedResponse,
}

impl QueryError {
    /// Rejections that happen before any request is sent.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::NotConnected | Self::Busy)
    }

    /// What the user can do about it.
    pub fn guidance(&self) -> String {
        match self {
            Self::InvalidInput => "Please type a question.".to_string(),
            Self::NotConnected => {
                "The service is not connected. Check the connection status and retry.".to_string()
            }
            Self::Busy => "Wait for the current query to finish.".to_string(),
            Self::Timeout => "Timeout: the query took too long to answer.".to_string(),
            Self::NetworkFailure(_) | Self::CrossOriginFailure(_) => {
                "Network error: check your connection and the service's CORS configuration."
                    .to_string()
            }
            Self::ServerError(400 | 422) => {
                "Invalid data: check the format of the question.".to_string()
            }
            Self::ServerError(status) if *status >= 500 => {
                "Internal server error: try again.".to_string()
            }
            Self::ServerError(status) => format!("The service rejected the query (HTTP {status})."),
            Self::MalformedResponse => {
                "The service sent a response that could not be read.".to_string()
            }
        }
    }
}
