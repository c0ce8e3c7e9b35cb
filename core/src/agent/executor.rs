use crate::agent::{Plan, StepInput, ToolAction, ToolContext, ToolRegistry};
use crate::error::Result;
use crate::memory::ConversationMemory;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepExecutionResult {
    pub id: u32,
    pub action: ToolAction,
    pub input: StepInput,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

pub struct Executor {
    registry: Arc<ToolRegistry>,
}

impl Executor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute_plan(
        &self,
        plan: &Plan,
        memory: &mut ConversationMemory,
        ctx: &ToolContext<'_>,
    ) -> Result<Vec<StepExecutionResult>> {
        let mut results = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            info!("Step {}: {}", step.id, step.action);
            let result = self.registry.call(&step.action, &step.input, ctx).await?;

            memory.add_step(
                step.id,
                step.action.clone(),
                step.input.clone(),
                result.summary.clone(),
            );
            results.push(StepExecutionResult {
                id: step.id,
                action: step.action.clone(),
                input: step.input.clone(),
                summary: result.summary,
                data: result.data,
            });
        }

        info!("Executed {} step(s)", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{PlannerStep, TravelContext};
    use crate::error::AgentError;
    use crate::testing::ScriptedProvider;
    use crate::tools::{ItineraryTool, TravelTipsTool};
    use tokio_util::sync::CancellationToken;

    fn step(id: u32, action: &str) -> PlannerStep {
        PlannerStep {
            id,
            action: ToolAction::parse(action),
            input: StepInput::new(),
        }
    }

    fn registry(provider: Arc<ScriptedProvider>) -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ItineraryTool::new(provider.clone())));
        registry.register(Arc::new(TravelTipsTool::new(provider)));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn steps_run_in_order_and_are_recorded() {
        let provider = Arc::new(ScriptedProvider::new(["itinerary", "tips"]));
        let executor = Executor::new(registry(provider));
        let plan = Plan {
            goal: "trip".into(),
            steps: vec![
                step(1, "generate_itinerary"),
                step(2, "book_hotel"),
                step(3, "travel_tips"),
            ],
        };
        let mut memory = ConversationMemory::new();
        let travel = TravelContext::default();
        let cancel = CancellationToken::new();

        let results = executor
            .execute_plan(&plan, &mut memory, &ToolContext::new(&travel, &cancel))
            .await
            .unwrap();

        let summaries: Vec<&str> = results.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec![
                "itinerary",
                "No tool implemented for action \"book_hotel\".",
                "tips"
            ]
        );
        let recorded: Vec<u32> = memory.get_steps().iter().map(|s| s.id).collect();
        assert_eq!(recorded, vec![1, 2, 3]);
        assert_eq!(memory.get_steps()[1].action, ToolAction::parse("book_hotel"));
    }

    #[tokio::test]
    async fn failing_step_aborts_the_run() {
        let provider = Arc::new(ScriptedProvider::from_results([
            Ok("itinerary".to_string()),
            Err(AgentError::Auth("bad key".into())),
        ]));
        let executor = Executor::new(registry(provider));
        let plan = Plan {
            goal: "trip".into(),
            steps: vec![step(1, "generate_itinerary"), step(2, "travel_tips")],
        };
        let mut memory = ConversationMemory::new();
        let travel = TravelContext::default();
        let cancel = CancellationToken::new();

        let result = executor
            .execute_plan(&plan, &mut memory, &ToolContext::new(&travel, &cancel))
            .await;
        assert!(matches!(result, Err(AgentError::Auth(_))));
        assert_eq!(memory.step_count(), 1);
    }

    #[test]
    fn serializes_camel_case_without_empty_data() {
        let result = StepExecutionResult {
            id: 1,
            action: ToolAction::CheckVisa,
            input: StepInput::new(),
            summary: "ok".into(),
            data: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["action"], "check_visa");
        assert!(value.get("data").is_none());
    }
}
