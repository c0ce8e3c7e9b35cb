use crate::error::{AgentError, Result};
use crate::weather::{DailyForecast, GeoLocation, WeatherService};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_max";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeoLocation>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<DailyForecast>,
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }

    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AgentError::Weather(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Weather(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::Weather(format!("Unreadable Open-Meteo response: {}", e)))
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn geocode(&self, name: &str) -> Result<Option<GeoLocation>> {
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let response: GeocodingResponse = self.get_json(&self.geocoding_url, &query).await?;
        Ok(response.results.and_then(|results| results.into_iter().next()))
    }

    async fn forecast(&self, location: &GeoLocation, days: u8) -> Result<DailyForecast> {
        let query = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", days.to_string()),
        ];

        let response: ForecastResponse = self.get_json(&self.forecast_url, &query).await?;
        Ok(response.daily.unwrap_or_default())
    }
}
