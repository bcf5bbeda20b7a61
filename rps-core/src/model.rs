use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where to look the weather up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One weather reading, as received from the provider.
///
/// Every field is optional because providers omit whatever they feel like.
/// A snapshot is never mutated: each fetch produces a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub pressure_hpa: Option<i64>,
    pub humidity_pct: Option<i64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_deg: Option<i64>,
    /// Short category such as "Rain" or "Clear".
    pub condition: Option<String>,
    /// Longer free text such as "light rain".
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}
