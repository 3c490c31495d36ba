use thiserror::Error;

/// Failure modes of a single upstream call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Upstream declined the request and (usually) said why.
    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The bearer credential is expired or invalid.
    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    /// Timeout or connection failure; no response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Success status, but the body is not what the operation promises.
    #[error("Protocol anomaly: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport(format!("request timed out: {}", err))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
