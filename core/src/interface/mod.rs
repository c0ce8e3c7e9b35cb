pub mod suggestions;

pub use suggestions::{DEFAULT_SUGGESTIONS, extract_suggestions};

use crate::agent::{
    AgentLoop, AgentRunResult, RunOptions, StepInput, ToolAction, ToolContext, TravelContext,
};
use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::providers::create_provider;
use crate::tools::default_registry;
use crate::weather::{OpenMeteoClient, WeatherService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripRequest {
    #[serde(default)]
    pub goal_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_context: Option<TravelContext>,
}

pub type VisaInfoRequest = TravelContext;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisaInfoResponse {
    pub visa_info: String,
    pub conversation_id: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{error}")]
pub struct PublicError {
    pub error: String,
}

impl From<AgentError> for PublicError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidInput(message) => PublicError { error: message },
            other => {
                error!("Request failed: {}", other);
                PublicError {
                    error: GENERIC_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }
}

pub struct TravelService {
    agent: AgentLoop,
}

impl TravelService {
    pub fn new(agent: AgentLoop) -> Self {
        Self { agent }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(config)?;
        let weather: Arc<dyn WeatherService> = Arc::new(
            OpenMeteoClient::new()
                .with_geocoding_url(config.weather.geocoding_url.clone())
                .with_forecast_url(config.weather.forecast_url.clone()),
        );
        let registry = default_registry(provider.clone(), weather, config);
        let agent =
            AgentLoop::new(provider, Arc::new(registry)).with_max_history(config.max_history);
        Ok(Self::new(agent))
    }

    pub fn agent(&self) -> &AgentLoop {
        &self.agent
    }

    pub async fn plan_trip(
        &self,
        request: PlanTripRequest,
        cancel: CancellationToken,
    ) -> Result<AgentRunResult> {
        let goal = request.goal_text.trim();
        if goal.is_empty() {
            return Err(AgentError::InvalidInput(
                "Missing goalText in request body.".to_string(),
            ));
        }

        self.agent
            .run(
                goal,
                RunOptions {
                    travel_context: request.travel_context,
                    prior_messages: Vec::new(),
                    cancel,
                },
            )
            .await
    }

    pub async fn visa_info(
        &self,
        request: VisaInfoRequest,
        cancel: CancellationToken,
    ) -> Result<VisaInfoResponse> {
        if request.follow_up().is_none() {
            validate_trip_fields(&request)?;
        }

        let conversation_id = request
            .conversation_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        info!("Visa query for conversation {}", conversation_id);

        let ctx = ToolContext::new(&request, &cancel);
        let result = self
            .agent
            .registry()
            .call(&ToolAction::CheckVisa, &StepInput::new(), &ctx)
            .await?;

        let (visa_info, suggestions) = extract_suggestions(&result.summary);
        Ok(VisaInfoResponse {
            visa_info,
            conversation_id,
            suggestions,
        })
    }
}

fn validate_trip_fields(request: &TravelContext) -> Result<()> {
    let missing: Vec<&str> = [
        ("passportFrom", &request.passport_from),
        ("travelFrom", &request.travel_from),
        ("travelTo", &request.travel_to),
    ]
    .into_iter()
    .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgentError::InvalidInput(format!(
            "Missing required fields: {}.",
            missing.join(", ")
        )))
    }
}
