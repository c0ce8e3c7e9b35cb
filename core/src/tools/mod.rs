use crate::agent::{StepInput, ToolAction, ToolContext, ToolRegistry};
use crate::config::Config;
use crate::error::{Result, cancellable};
use crate::traits::{ChatMessage, ChatRequest, Provider, Tool};
use crate::weather::WeatherService;
use serde_json::Value;
use std::sync::Arc;

pub mod budget;
pub mod check_visa;
pub mod itinerary;
pub mod travel_tips;
pub mod weather;

pub use budget::BudgetEstimatorTool;
pub use check_visa::CheckVisaTool;
pub use itinerary::ItineraryTool;
pub use travel_tips::TravelTipsTool;
pub use weather::WeatherTool;

const DEFAULT_TRIP_DAYS: u64 = 7;

pub fn extract_string_arg_opt(input: &StepInput, key: &str) -> Option<String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn extract_u64_arg_opt(input: &StepInput, key: &str, default: u64) -> u64 {
    match input.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn destination_or(input: &StepInput, ctx: &ToolContext<'_>, default: &str) -> String {
    extract_string_arg_opt(input, "destination")
        .or_else(|| {
            ctx.travel
                .travel_to
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn trip_days(input: &StepInput) -> u64 {
    extract_u64_arg_opt(input, "days", DEFAULT_TRIP_DAYS)
}

pub(crate) async fn ask_model(
    provider: &dyn Provider,
    ctx: &ToolContext<'_>,
    system: &str,
    user: &str,
    temperature: f64,
    max_tokens: u32,
) -> Result<Option<String>> {
    let messages = [ChatMessage::system(system), ChatMessage::user(user)];
    complete(provider, ctx, &messages, temperature, max_tokens).await
}

pub(crate) async fn complete(
    provider: &dyn Provider,
    ctx: &ToolContext<'_>,
    messages: &[ChatMessage],
    temperature: f64,
    max_tokens: u32,
) -> Result<Option<String>> {
    let request = ChatRequest::new(messages)
        .with_temperature(temperature)
        .with_max_tokens(max_tokens);

    let response = cancellable(ctx.cancel, provider.chat(request)).await?;
    Ok(response.trimmed().map(str::to_string))
}

pub fn build_tool(
    action: &ToolAction,
    provider: &Arc<dyn Provider>,
    weather: &Arc<dyn WeatherService>,
    config: &Config,
) -> Option<Arc<dyn Tool>> {
    let tool: Arc<dyn Tool> = match action {
        ToolAction::CheckVisa => Arc::new(
            CheckVisaTool::new(provider.clone()).with_history_window(config.history_window),
        ),
        ToolAction::GenerateItinerary => Arc::new(ItineraryTool::new(provider.clone())),
        ToolAction::EstimateBudget => Arc::new(BudgetEstimatorTool::new(provider.clone())),
        ToolAction::TravelTips => Arc::new(TravelTipsTool::new(provider.clone())),
        ToolAction::GetWeather => Arc::new(
            WeatherTool::new(weather.clone())
                .with_forecast_days(config.weather.forecast_days)
                .with_display_days(config.weather.display_days),
        ),
        ToolAction::Unrecognized(_) => return None,
    };
    Some(tool)
}

pub fn default_registry(
    provider: Arc<dyn Provider>,
    weather: Arc<dyn WeatherService>,
    config: &Config,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new().with_retry(config.retry);
    for action in ToolAction::KNOWN {
        if let Some(tool) = build_tool(&action, &provider, &weather, config) {
            registry.register(tool);
        }
    }
    registry
}
