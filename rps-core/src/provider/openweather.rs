use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    http::HttpTransport,
    model::{Coordinates, WeatherSnapshot},
};

use super::WeatherProvider;

pub const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key,
            base_url: OPENWEATHER_CURRENT_URL.to_string(),
            transport,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherSnapshot, FetchError> {
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();
        debug!(%at, "fetching current weather from OpenWeather");

        let res = self
            .transport
            .get(
                &self.base_url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        if !res.is_success() {
            warn!(
                status = res.status,
                body = %truncate_body(&res.body),
                "OpenWeather request failed"
            );
        }
        let res = res.error_for_status()?;

        let parsed: CurrentWeatherResponse = serde_json::from_str(&res.body)?;
        parsed.into_snapshot()
    }
}

/// Current weather payload. Only `main` and `weather` feed the verdict; the
/// rest is carried so the schema stays complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Option<CoordDetails>,
    pub weather: Option<Vec<WeatherCondition>>,
    pub base: Option<String>,
    pub main: Option<MainDetails>,
    pub visibility: Option<i64>,
    pub wind: Option<WindDetails>,
    pub clouds: Option<CloudsDetails>,
    pub rain: Option<PrecipitationDetails>,
    pub snow: Option<PrecipitationDetails>,
    pub dt: Option<i64>,
    pub sys: Option<SysDetails>,
    pub timezone: Option<i32>,
    #[serde(rename = "id")]
    pub city_id: Option<i64>,
    pub name: Option<String>,
    pub cod: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordDetails {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: Option<i64>,
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainDetails {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<i64>,
    pub humidity: Option<i64>,
    pub sea_level: Option<i64>,
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindDetails {
    pub speed: Option<f64>,
    pub deg: Option<i64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudsDetails {
    pub all: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationDetails {
    #[serde(rename = "1h")]
    pub last_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub last_three_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SysDetails {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub id: Option<i64>,
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl CurrentWeatherResponse {
    /// Requires `main` and at least one `weather` entry.
    pub fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let main = self
            .main
            .ok_or_else(|| FetchError::MissingData("response has no `main` block".into()))?;

        let condition = self
            .weather
            .and_then(|conditions| conditions.into_iter().next())
            .ok_or_else(|| FetchError::MissingData("response has no `weather` entry".into()))?;

        let wind = self.wind.unwrap_or_default();

        Ok(WeatherSnapshot {
            temperature_c: main.temp,
            feels_like_c: main.feels_like,
            temp_min_c: main.temp_min,
            temp_max_c: main.temp_max,
            pressure_hpa: main.pressure,
            humidity_pct: main.humidity,
            wind_speed_mps: wind.speed,
            wind_deg: wind.deg,
            condition: condition.main,
            description: condition.description,
            location_name: self.name,
            observed_at: self.dt.and_then(unix_to_utc),
        })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, http::testing::RecordingTransport};

    const CESENA_CLEAR: &str = r#"{
        "coord": {"lon": 12.2191, "lat": 44.1647},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "base": "stations",
        "main": {"temp": 21.3, "feels_like": 20.9, "temp_min": 19.8, "temp_max": 22.6,
                 "pressure": 1016, "humidity": 55, "sea_level": 1016, "grnd_level": 1012},
        "visibility": 10000,
        "wind": {"speed": 3.6, "deg": 70, "gust": 5.1},
        "clouds": {"all": 0},
        "dt": 1717326000,
        "sys": {"type": 2, "id": 2004688, "country": "IT",
                "sunrise": 1717298527, "sunset": 1717353241},
        "timezone": 7200,
        "id": 3179806,
        "name": "Cesena",
        "cod": 200
    }"#;

    fn provider(transport: Arc<RecordingTransport>) -> OpenWeatherProvider {
        OpenWeatherProvider::new("SECRET".into(), transport)
    }

    #[tokio::test]
    async fn success_maps_every_consumed_field() {
        let transport = Arc::new(RecordingTransport::ok(CESENA_CLEAR));
        let snapshot = provider(transport)
            .current_weather(Coordinates::new(44.1647, 12.2191))
            .await
            .expect("fetch should succeed");

        assert_eq!(snapshot.temperature_c, Some(21.3));
        assert_eq!(snapshot.feels_like_c, Some(20.9));
        assert_eq!(snapshot.temp_min_c, Some(19.8));
        assert_eq!(snapshot.temp_max_c, Some(22.6));
        assert_eq!(snapshot.pressure_hpa, Some(1016));
        assert_eq!(snapshot.humidity_pct, Some(55));
        assert_eq!(snapshot.wind_speed_mps, Some(3.6));
        assert_eq!(snapshot.wind_deg, Some(70));
        assert_eq!(snapshot.condition.as_deref(), Some("Clear"));
        assert_eq!(snapshot.description.as_deref(), Some("clear sky"));
        assert_eq!(snapshot.location_name.as_deref(), Some("Cesena"));
        assert_eq!(snapshot.observed_at.map(|t| t.timestamp()), Some(1717326000));
    }

    #[tokio::test]
    async fn request_carries_coordinates_key_and_units() {
        let transport = Arc::new(RecordingTransport::ok(CESENA_CLEAR));
        provider(transport.clone())
            .current_weather(Coordinates::new(44.5, 12.25))
            .await
            .expect("fetch should succeed");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);

        let req = &requests[0];
        assert_eq!(req.url, OPENWEATHER_CURRENT_URL);
        assert_eq!(req.param("lat"), Some("44.5"));
        assert_eq!(req.param("lon"), Some("12.25"));
        assert_eq!(req.param("appid"), Some("SECRET"));
        assert_eq!(req.param("units"), Some("metric"));
    }

    #[tokio::test]
    async fn empty_weather_list_is_missing_data() {
        let body = r#"{"main": {"temp": 20.0}, "weather": []}"#;
        let transport = Arc::new(RecordingTransport::ok(body));

        let err = provider(transport)
            .current_weather(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(err.to_string().contains("essential data missing"));
    }

    #[tokio::test]
    async fn missing_main_is_missing_data() {
        let body = r#"{"weather": [{"main": "Clear"}]}"#;
        let transport = Arc::new(RecordingTransport::ok(body));

        let err = provider(transport)
            .current_weather(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::MissingData(_)));
    }

    #[tokio::test]
    async fn server_error_reports_status() {
        let transport = Arc::new(RecordingTransport::respond(
            500,
            "Internal Server Error",
            "oops",
        ));

        let err = provider(transport)
            .current_weather(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn garbage_body_is_decode_failure() {
        let transport = Arc::new(RecordingTransport::ok("<html>"));

        let err = provider(transport)
            .current_weather(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn passthrough_fields_decode() {
        let body = r#"{
            "rain": {"1h": 0.4},
            "snow": {"3h": 1.2},
            "sys": {"type": 1, "country": "IT"},
            "cod": 200
        }"#;
        let parsed: CurrentWeatherResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.rain.and_then(|r| r.last_hour), Some(0.4));
        assert_eq!(parsed.snow.and_then(|s| s.last_three_hours), Some(1.2));
        assert_eq!(parsed.sys.and_then(|s| s.kind), Some(1));
        assert_eq!(parsed.cod, Some(200));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
