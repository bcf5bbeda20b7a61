use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::FetchError,
    http::HttpTransport,
    model::{Coordinates, WeatherSnapshot},
    provider::{jsongpt::JsonGptProvider, openweather::OpenWeatherProvider},
};

pub mod jsongpt;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    JsonGpt,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::JsonGpt => "jsongpt",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::JsonGpt]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "jsongpt" => Ok(ProviderId::JsonGpt),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, jsongpt."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherSnapshot, FetchError>;
}

#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    /// Returns a single quote for `prompt`, without enclosing quote marks.
    async fn quote(&self, prompt: &str) -> Result<String, FetchError>;
}

/// Build the weather provider from config.
///
/// Fails with [`FetchError::NotConfigured`] when no API key is available.
pub fn weather_provider_from_config(
    config: &Config,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn WeatherProvider>, FetchError> {
    let id = ProviderId::OpenWeather;
    let api_key = config.resolve_api_key(id)?;

    let mut provider = OpenWeatherProvider::new(api_key.to_owned(), transport);
    if let Some(url) = config.provider_base_url(id) {
        provider = provider.with_base_url(url);
    }

    Ok(Arc::new(provider))
}

/// Build the quote provider from config. It needs no credentials.
pub fn quote_provider_from_config(
    config: &Config,
    transport: Arc<dyn HttpTransport>,
) -> Arc<dyn QuoteProvider> {
    let mut provider = JsonGptProvider::new(transport);
    if let Some(url) = config.provider_base_url(ProviderId::JsonGpt) {
        provider = provider.with_base_url(url);
    }

    Arc::new(provider)
}
