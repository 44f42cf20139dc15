use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    model::WeatherObservation,
    provider::{FetchError, truncate_body},
    scoring::round_to_tenth,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openweathermap.org")
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, city_id: i64) -> Result<WeatherObservation, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("id", city_id.to_string().as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        debug!(city_id, city = %parsed.name, "received OpenWeather observation");

        Ok(parsed.into_observation())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: i32,
    #[serde(default)]
    pressure: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: i32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    id: i64,
    name: String,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    /// Metres.
    #[serde(default)]
    visibility: i32,
}

impl OwCurrentResponse {
    fn into_observation(self) -> WeatherObservation {
        let weather_description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        let observed_at = self.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);

        WeatherObservation {
            city_id: self.id,
            city_name: self.name,
            temperature: round_to_tenth(self.main.temp),
            humidity: self.main.humidity,
            wind_speed: round_to_tenth(self.wind.speed),
            cloud_percentage: self.clouds.all,
            visibility: self.visibility / 1000,
            pressure: self.main.pressure,
            is_snowing: WeatherObservation::describes_snow(&weather_description),
            weather_description,
            observed_at,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_observation(&self, city_id: i64) -> Result<WeatherObservation, FetchError> {
        self.fetch_current(city_id).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
