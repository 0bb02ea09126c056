pub mod client;
pub mod credentials;
pub mod types;

use thiserror::Error;

use types::RETRY_STATUSES;

#[derive(Debug, Error)]
pub enum PollinationsError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("expected an image but got content type {content_type:?}")]
    NonImage { content_type: String, detail: String },
}

impl From<reqwest::Error> for PollinationsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PollinationsError::Timeout
        } else {
            PollinationsError::Http(e)
        }
    }
}

impl PollinationsError {
    /// Whether the transport layer should try again.
    pub fn is_transient(&self) -> bool {
        matches!(self, PollinationsError::ApiError { status, .. } if RETRY_STATUSES.contains(status))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PollinationsError::ApiError { status, .. } => Some(*status),
            PollinationsError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
