pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn label(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DailyForecast {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn geocode(&self, name: &str) -> Result<Option<GeoLocation>>;

    async fn forecast(&self, location: &GeoLocation, days: u8) -> Result<DailyForecast>;
}

pub fn format_forecast(
    location: &GeoLocation,
    forecast: &DailyForecast,
    forecast_days: u8,
    display_days: usize,
) -> String {
    let mut summary = format!(
        "Weather forecast for **{}** (next {} days):\n\n",
        location.label(),
        forecast_days
    );

    if forecast.time.is_empty() {
        summary.push_str("No daily forecast data available.\n");
    } else {
        for (i, date) in forecast.time.iter().take(display_days).enumerate() {
            let _ = writeln!(
                summary,
                "- **{}**: High {}°C, Low {}°C, 🌧️ {}% rain",
                date,
                reading(&forecast.temperature_2m_max, i),
                reading(&forecast.temperature_2m_min, i),
                reading(&forecast.precipitation_probability_max, i),
            );
        }
    }

    summary.push_str("\n*Data provided by Open-Meteo*");
    summary
}

fn reading(series: &[Option<f64>], index: usize) -> String {
    match series.get(index).copied().flatten() {
        Some(value) => format!("{value}"),
        None => "n/a".to_string(),
    }
}
