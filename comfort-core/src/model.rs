use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One city's current weather, as it reaches the scorer.
///
/// Units are already normalized at the ingestion boundary: temperature in °C,
/// wind in m/s and visibility in whole kilometres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub city_id: i64,
    pub city_name: String,
    pub temperature: f64,
    pub humidity: i32,
    pub wind_speed: f64,
    pub cloud_percentage: i32,
    pub visibility: i32,
    /// Informational only, never scored.
    pub pressure: i32,
    pub weather_description: String,
    pub is_snowing: bool,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Whether a free-form condition text describes snowfall.
    pub fn describes_snow(description: &str) -> bool {
        description.to_lowercase().contains("snow")
    }
}

/// An observation with its comfort score and, once ranked, its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCity {
    #[serde(flatten)]
    pub observation: WeatherObservation,
    pub comfort_score: f64,
    /// 0 until the batch has been ranked.
    pub rank: u32,
}

impl ScoredCity {
    pub fn new(observation: WeatherObservation, comfort_score: f64) -> Self {
        Self { observation, comfort_score, rank: 0 }
    }

    pub fn city_id(&self) -> i64 {
        self.observation.city_id
    }

    pub fn city_name(&self) -> &str {
        &self.observation.city_name
    }
}
