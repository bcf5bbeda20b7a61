use std::sync::Arc;

use crate::{
    Config,
    error::FetchError,
    http::HttpTransport,
    model::{Coordinates, WeatherSnapshot},
    provider::{WeatherProvider, weather_provider_from_config},
    suitability,
};

use super::{FetchPresenter, FetchState, StartOutcome, StateReceiver};

/// The "is it good weather to play?" flow.
pub struct WeatherPresenter {
    /// `Err` holds why the client could not be built.
    provider: Result<Arc<dyn WeatherProvider>, FetchError>,
    flow: FetchPresenter<WeatherSnapshot>,
}

impl WeatherPresenter {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider: Ok(provider),
            flow: FetchPresenter::new("weather"),
        }
    }

    /// A presenter whose every fetch fails with [`FetchError::NotConfigured`].
    pub fn unconfigured(missing: impl Into<String>) -> Self {
        Self::failing(FetchError::NotConfigured(missing.into()))
    }

    fn failing(err: FetchError) -> Self {
        Self {
            provider: Err(err),
            flow: FetchPresenter::new("weather"),
        }
    }

    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        match weather_provider_from_config(config, transport) {
            Ok(provider) => Self::new(provider),
            Err(err) => Self::failing(err),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_ok()
    }

    /// Start a fetch in the background.
    pub fn start_fetch(&self, at: Coordinates) -> StartOutcome {
        self.flow.start(load(self.provider.clone(), at))
    }

    /// Fetch and wait for the result.
    pub async fn fetch(&self, at: Coordinates) -> StartOutcome {
        self.flow.run(load(self.provider.clone(), at)).await
    }

    pub fn subscribe(&self) -> StateReceiver<WeatherSnapshot> {
        self.flow.subscribe()
    }

    pub fn state(&self) -> Option<FetchState<WeatherSnapshot>> {
        self.flow.state()
    }

    /// Suitability of the loaded snapshot, `None` unless the last fetch
    /// succeeded.
    pub fn verdict(&self) -> Option<bool> {
        self.state()
            .and_then(|state| state.success().map(|s| suitability::evaluate(Some(s))))
    }
}

async fn load(
    provider: Result<Arc<dyn WeatherProvider>, FetchError>,
    at: Coordinates,
) -> Result<WeatherSnapshot, FetchError> {
    provider?.current_weather(at).await
}
