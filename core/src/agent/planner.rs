use crate::agent::{StepInput, ToolAction, TravelContext};
use crate::error::{Result, cancellable};
use crate::traits::{ChatMessage, ChatRequest, Provider};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const PLANNER_TEMPERATURE: f64 = 0.4;

const PLANNER_SYSTEM_PROMPT: &str = r#"You are a travel planning agent. Break user goals into structured executable steps.

You MUST respond with pure JSON only, no markdown, no comments.

JSON schema:
{
  "goal": string,
  "steps": [
    { "id": number, "action": string, "input": object }
  ]
}

Guidance:
- First, understand the user's high-level goal (e.g. "plan a 10 day trip to Italy in spring").
- Then decompose it into concrete actions such as:
  - "check_visa"            (visa and transit rules)
  - "generate_itinerary"    (day-by-day or high level plan)
  - "estimate_budget"       (rough cost ranges)
  - "travel_tips"           (practical tips and cautions)
  - "get_weather"           (7-day weather forecast)
- Always start ids at 1 and increment by 1.
- The "input" object should contain any structured fields you know
  (e.g. passport country, origin, destination, duration in days, travel style, interests)."#;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerStep {
    pub id: u32,
    pub action: ToolAction,
    pub input: StepInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub goal: String,
    pub steps: Vec<PlannerStep>,
}

pub struct Planner {
    provider: Arc<dyn Provider>,
}

impl Planner {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn create_plan(
        &self,
        user_goal: &str,
        travel: Option<&TravelContext>,
        cancel: &CancellationToken,
    ) -> Result<Plan> {
        let mut payload = json!({ "userGoal": user_goal });
        if let Some(travel) = travel {
            payload["travelContext"] = serde_json::to_value(travel)?;
        }

        let messages = [
            ChatMessage::system(PLANNER_SYSTEM_PROMPT),
            ChatMessage::user(payload.to_string()),
        ];
        let request = ChatRequest::new(&messages).with_temperature(PLANNER_TEMPERATURE);

        let response = cancellable(cancel, self.provider.chat(request)).await?;

        match parse_plan(response.text_or_empty(), user_goal) {
            Some(plan) => {
                debug!(steps = plan.steps.len(), "Planner produced a plan");
                Ok(plan)
            }
            None => {
                warn!("Planner reply was not a valid plan, using fallback plan");
                Ok(fallback_plan(user_goal, travel))
            }
        }
    }
}

pub fn parse_plan(raw: &str, user_goal: &str) -> Option<Plan> {
    let parsed: Value = serde_json::from_str(raw).ok()?;

    let goal = parsed
        .get("goal")
        .and_then(Value::as_str)
        .filter(|goal| !goal.is_empty())?;
    let raw_steps = parsed.get("steps").and_then(Value::as_array)?;

    let steps = raw_steps
        .iter()
        .enumerate()
        .map(|(index, step)| normalize_step(index, step))
        .collect();

    let goal = if goal.trim().is_empty() {
        user_goal.to_string()
    } else {
        goal.to_string()
    };

    Some(Plan { goal, steps })
}

fn normalize_step(index: usize, step: &Value) -> PlannerStep {
    let id = step
        .get("id")
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .unwrap_or(index as u32 + 1);

    let action = step
        .get("action")
        .and_then(Value::as_str)
        .filter(|action| !action.is_empty())
        .map(ToolAction::parse)
        .unwrap_or(ToolAction::CheckVisa);

    let input = step
        .get("input")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    PlannerStep { id, action, input }
}

pub fn fallback_plan(user_goal: &str, travel: Option<&TravelContext>) -> Plan {
    let input = travel.map(TravelContext::to_input).unwrap_or_default();

    let steps = [
        ToolAction::CheckVisa,
        ToolAction::GenerateItinerary,
        ToolAction::EstimateBudget,
        ToolAction::TravelTips,
    ]
    .into_iter()
    .zip(1..)
    .map(|(action, id)| PlannerStep {
        id,
        action,
        input: input.clone(),
    })
    .collect();

    Plan {
        goal: user_goal.to_string(),
        steps,
    }
}
