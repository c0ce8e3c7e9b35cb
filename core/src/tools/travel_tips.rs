use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::error::Result;
use crate::tools::{ask_model, destination_or};
use crate::traits::{Provider, Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const TIPS_SYSTEM_PROMPT: &str = "You are an experienced traveler sharing practical, safety-conscious tips. Avoid generic platitudes.";

pub struct TravelTipsTool {
    provider: Arc<dyn Provider>,
}

impl TravelTipsTool {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

pub fn build_tips_prompt(destination: &str) -> String {
    format!(
        "Provide practical, safety-conscious travel tips for {destination}.

Focus on:
- Entry / border control expectations
- Local customs and etiquette
- Safety basics
- Health considerations
- Connectivity (SIM / eSIM / Wi-Fi)
- Packing highlights

Keep it concise and skimmable."
    )
}

#[async_trait]
impl Tool for TravelTipsTool {
    fn action(&self) -> ToolAction {
        ToolAction::TravelTips
    }

    fn description(&self) -> &str {
        "Provide practical travel tips, customs, and safety considerations."
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

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult> {
        let destination = destination_or(input, ctx, "this trip");

        let reply = ask_model(
            self.provider.as_ref(),
            ctx,
            TIPS_SYSTEM_PROMPT,
            &build_tips_prompt(&destination),
            0.7,
            700,
        )
        .await?;

        Ok(ToolResult::summary(
            reply.unwrap_or_else(|| format!("Travel tips for {}.", destination)),
        ))
    }
}
