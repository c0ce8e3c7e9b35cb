use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::error::{Result, cancellable};
use crate::tools::destination_or;
use crate::traits::{FailurePolicy, Tool, ToolResult};
use crate::weather::{WeatherService, format_forecast};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub struct WeatherTool {
    service: Arc<dyn WeatherService>,
    forecast_days: u8,
    display_days: usize,
}

impl WeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self {
            service,
            forecast_days: 7,
            display_days: 5,
        }
    }

    pub fn with_forecast_days(mut self, forecast_days: u8) -> Self {
        self.forecast_days = forecast_days.max(1);
        self
    }

    pub fn with_display_days(mut self, display_days: usize) -> Self {
        self.display_days = display_days;
        self
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn action(&self) -> ToolAction {
        ToolAction::GetWeather
    }

    fn description(&self) -> &str {
        "Get the upcoming daily weather forecast for a destination."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string" }
            },
            "required": ["destination"]
        })
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Degrade
    }

    fn degraded_summary(&self, input: &StepInput, ctx: &ToolContext<'_>) -> String {
        format!(
            "Failed to fetch weather for {}. (External API Error)",
            destination_or(input, ctx, "")
        )
    }

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult> {
        let destination = destination_or(input, ctx, "");
        if destination.is_empty() {
            return Ok(ToolResult::summary(
                "No destination provided for weather check.",
            ));
        }

        let Some(location) = cancellable(ctx.cancel, self.service.geocode(&destination)).await?
        else {
            debug!("Geocoder has no match for {}", destination);
            return Ok(ToolResult::summary(format!(
                "Could not find weather data for {}.",
                destination
            )));
        };

        let forecast = cancellable(
            ctx.cancel,
            self.service.forecast(&location, self.forecast_days),
        )
        .await?;

        let summary = format_forecast(&location, &forecast, self.forecast_days, self.display_days);
        Ok(ToolResult::with_data(
            summary,
            json!({ "location": location, "daily": forecast }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::TravelContext;
    use crate::error::AgentError;
    use crate::testing::StaticWeather;
    use crate::weather::{DailyForecast, GeoLocation};
    use tokio_util::sync::CancellationToken;

    fn lisbon() -> GeoLocation {
        GeoLocation {
            name: "Lisbon".into(),
            country: Some("Portugal".into()),
            latitude: 38.72,
            longitude: -9.14,
        }
    }

    fn destination(name: &str) -> StepInput {
        json!({ "destination": name }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn no_destination_anywhere() {
        let tool = WeatherTool::new(Arc::new(StaticWeather {
            location: Some(lisbon()),
            forecast: None,
        }));
        let travel = TravelContext::default();
        let cancel = CancellationToken::new();

        let result = tool
            .execute(&StepInput::new(), &ToolContext::new(&travel, &cancel))
            .await
            .unwrap();
        assert_eq!(result.summary, "No destination provided for weather check.");
    }

    #[tokio::test]
    async fn unknown_place_resolves_without_error() {
        let tool = WeatherTool::new(Arc::new(StaticWeather {
            location: None,
            forecast: None,
        }));
        let travel = TravelContext::default();
        let cancel = CancellationToken::new();

        let result = tool
            .execute(&destination("Atlantis"), &ToolContext::new(&travel, &cancel))
            .await
            .unwrap();
        assert_eq!(result.summary, "Could not find weather data for Atlantis.");
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn forecast_is_formatted_and_attached() {
        let forecast = DailyForecast {
            time: vec!["2026-10-20".into(), "2026-10-21".into()],
            temperature_2m_max: vec![Some(24.0), Some(22.5)],
            temperature_2m_min: vec![Some(15.0), Some(14.0)],
            precipitation_probability_max: vec![Some(10.0), None],
        };
        let tool = WeatherTool::new(Arc::new(StaticWeather {
            location: Some(lisbon()),
            forecast: Some(forecast),
        }));
        let travel = TravelContext {
            travel_to: Some("Lisbon".into()),
            ..Default::default()
        };
        let cancel = CancellationToken::new();

        let result = tool
            .execute(&StepInput::new(), &ToolContext::new(&travel, &cancel))
            .await
            .unwrap();
        assert!(result.summary.contains("**Lisbon, Portugal**"));
        assert!(result.summary.contains("- **2026-10-21**: High 22.5°C, Low 14°C, 🌧️ n/a% rain"));
        let data = result.data.unwrap();
        assert_eq!(data["daily"]["time"][0], "2026-10-20");
    }

    #[tokio::test]
    async fn service_failure_surfaces_with_a_degraded_summary() {
        let tool = WeatherTool::new(Arc::new(StaticWeather {
            location: Some(lisbon()),
            forecast: None,
        }));
        let travel = TravelContext::default();
        let cancel = CancellationToken::new();
        let ctx = ToolContext::new(&travel, &cancel);
        let input = destination("Lisbon");

        let result = tool.execute(&input, &ctx).await;
        assert!(matches!(result, Err(AgentError::Weather(_))));
        assert_eq!(tool.failure_policy(), FailurePolicy::Degrade);
        assert_eq!(
            tool.degraded_summary(&input, &ctx),
            "Failed to fetch weather for Lisbon. (External API Error)"
        );
    }
}
