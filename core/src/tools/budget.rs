use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::error::Result;
use crate::tools::{ask_model, destination_or, extract_string_arg_opt, trip_days};
use crate::traits::{Provider, Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const BUDGET_SYSTEM_PROMPT: &str = "You are a practical travel budget estimator. Use sensible, clearly-labeled rough ranges and disclaimers.";
const DEFAULT_STYLE: &str = "mid-range";

pub struct BudgetEstimatorTool {
    provider: Arc<dyn Provider>,
}

impl BudgetEstimatorTool {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

pub fn build_budget_prompt(destination: &str, days: u64, style: &str) -> String {
    format!(
        "Estimate a rough budget for a {days}-day trip to {destination} for a {style} traveler.

Break down:
- Accommodation
- Food
- Local transport
- Activities / attractions
- Misc / buffer

Return:
- Bullet list cost breakdown
- Low / mid / high total estimate range in local currency and USD."
    )
}

#[async_trait]
impl Tool for BudgetEstimatorTool {
    fn action(&self) -> ToolAction {
        ToolAction::EstimateBudget
    }

    fn description(&self) -> &str {
        "Estimate a rough travel budget for a trip."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string" },
                "days": { "type": "number", "minimum": 1, "maximum": 60 },
                "style": { "type": "string", "enum": ["budget", "mid-range", "luxury"] }
            },
            "required": ["destination", "days"]
        })
    }

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult> {
        let days = trip_days(input);
        let style = extract_string_arg_opt(input, "style")
            .or_else(|| ctx.travel.travel_style.clone())
            .unwrap_or_else(|| DEFAULT_STYLE.to_string());
        let destination = destination_or(input, ctx, "the destination country");

        let reply = ask_model(
            self.provider.as_ref(),
            ctx,
            BUDGET_SYSTEM_PROMPT,
            &build_budget_prompt(&destination, days, &style),
            0.6,
            700,
        )
        .await?;

        Ok(ToolResult::summary(reply.unwrap_or_else(|| {
            format!(
                "Budget estimate for {}-day {} trip to {}.",
                days, style, destination
            )
        })))
    }
}
