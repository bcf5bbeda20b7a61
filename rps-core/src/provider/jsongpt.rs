use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::{error::FetchError, http::HttpTransport};

use super::QuoteProvider;

pub const JSONGPT_URL: &str = "https://api.jsongpt.com/json";

/// Fixed value of the `quotes` query parameter: it tells the service what
/// shape to generate.
const QUOTES_SHAPE: &str = "array of quotes";

#[derive(Debug, Clone)]
pub struct JsonGptProvider {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl JsonGptProvider {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: JSONGPT_URL.to_string(),
            transport,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    quotes: Option<Vec<String>>,
}

#[async_trait]
impl QuoteProvider for JsonGptProvider {
    async fn quote(&self, prompt: &str) -> Result<String, FetchError> {
        debug!(prompt, "requesting quote");

        let res = self
            .transport
            .get(&self.base_url, &[("prompt", prompt), ("quotes", QUOTES_SHAPE)])
            .await?
            .error_for_status()?;

        let parsed: QuotesResponse = serde_json::from_str(&res.body)?;

        parsed
            .quotes
            .and_then(|quotes| quotes.into_iter().next())
            .map(|quote| strip_surrounding_quotes(&quote).to_string())
            .ok_or_else(|| FetchError::MissingData("No quotes found.".into()))
    }
}

/// Removes one `"` from each end, only when both ends have one.
pub fn strip_surrounding_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}
