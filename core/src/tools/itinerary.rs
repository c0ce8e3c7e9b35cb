use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::error::Result;
use crate::tools::{ask_model, destination_or, trip_days};
use crate::traits::{Provider, Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const ITINERARY_SYSTEM_PROMPT: &str =
    "You are a concise but helpful travel itinerary generator. Be practical and avoid fluff.";

pub struct ItineraryTool {
    provider: Arc<dyn Provider>,
}

impl ItineraryTool {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

pub fn build_itinerary_prompt(destination: &str, days: u64) -> String {
    format!(
        "Create a concise, practical {days}-day travel itinerary for a trip to {destination}.

Focus on:
- Balanced sightseeing, rest, and local experiences
- Clear day-by-day structure
- Short, scannable bullet points

Return a markdown-style outline."
    )
}

#[async_trait]
impl Tool for ItineraryTool {
    fn action(&self) -> ToolAction {
        ToolAction::GenerateItinerary
    }

    fn description(&self) -> &str {
        "Generate a day-by-day itinerary for a trip."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string" },
                "days": { "type": "number", "minimum": 1, "maximum": 60 }
            },
            "required": ["destination"]
        })
    }

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult> {
        let days = trip_days(input);
        let destination = destination_or(input, ctx, "your destination");

        let reply = ask_model(
            self.provider.as_ref(),
            ctx,
            ITINERARY_SYSTEM_PROMPT,
            &build_itinerary_prompt(&destination, days),
            0.7,
            900,
        )
        .await?;

        Ok(ToolResult::summary(reply.unwrap_or_else(|| {
            format!("Day-by-day plan for {}.", destination)
        })))
    }
}
