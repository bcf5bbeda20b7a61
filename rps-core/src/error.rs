use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// Coarse classification of a failed fetch, used by display surfaces to pick
/// a message without matching on every [`FetchError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A credential or configuration value required by the client is missing.
    NotConfigured,
    /// Non-2xx HTTP status or a network-level failure.
    TransportFailure,
    /// The response arrived but required fields are absent or undecodable.
    ParseFailure,
    Unknown,
}

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("request failed: {reason} (code: {status})")]
    Status { status: u16, reason: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("essential data missing: {0}")]
    MissingData(String),

    #[error("could not decode response body: {0}")]
    Decode(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::NotConfigured(_) => ErrorKind::NotConfigured,
            FetchError::Status { .. } | FetchError::Transport(_) => ErrorKind::TransportFailure,
            FetchError::MissingData(_) | FetchError::Decode(_) => ErrorKind::ParseFailure,
            FetchError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let detail = with_causes(&err);
        if err.is_decode() {
            FetchError::Decode(detail)
        } else if err.is_builder() {
            FetchError::Unknown(detail)
        } else {
            FetchError::Transport(detail)
        }
    }
}

/// `err` followed by each of its sources, joined with `": "`.
///
/// reqwest keeps the actual cause (refused connection, bad URL, ...) in the
/// source chain rather than in its own `Display`.
fn with_causes(err: &dyn StdError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.contains(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
