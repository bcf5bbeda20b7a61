//! The HTTP seam every provider talks through.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::debug;

use crate::error::FetchError;

/// A response whose body has already been read to a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status: self.status,
                reason: self.reason,
            })
        }
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Issue a single `GET` with the given query parameters.
    ///
    /// A non-2xx status is still `Ok`; only failures to get a response at all
    /// are errors here.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        debug!(url, status = status.as_u16(), "received response");

        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = res.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}
