use crate::agent::{
    Executor, Plan, Planner, StepExecutionResult, ToolAction, ToolContext, ToolRegistry,
    TravelContext,
};
use crate::error::{Result, cancellable};
use crate::memory::ConversationMemory;
use crate::traits::{ChatMessage, ChatRequest, Provider};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEFAULT_MAX_HISTORY: usize = 50;
const SYNTHESIS_TEMPERATURE: f64 = 0.6;
const SYNTHESIS_MAX_TOKENS: u32 = 1200;
const NO_RESPONSE: &str = "No response generated.";

const AGENT_SYSTEM_PROMPT: &str = r#"You are an autonomous AI Travel Agent.
You plan before acting.
You call tools when needed.
You think step-by-step internally but return only structured, helpful results to the user.

Rules:
- Do NOT expose your chain-of-thought.
- Focus on clear, practical travel advice.
- Do NOT include a section titled "Suggested follow-up questions" or explicit lists of next questions.
- The UI will surface follow-up questions separately; your reply should focus only on the main answer."#;

const SYNTHESIS_INSTRUCTION: &str = "Summarize the following travel planning steps into a single, coherent answer. Focus on being practical and clear. Do NOT repeat internal reasoning.";

pub struct RunOptions {
    pub travel_context: Option<TravelContext>,
    pub prior_messages: Vec<ChatMessage>,
    pub cancel: CancellationToken,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            travel_context: None,
            prior_messages: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRunResult {
    pub final_text: String,
    pub plan: Plan,
    pub steps: Vec<StepExecutionResult>,
}

pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    planner: Planner,
    executor: Executor,
    registry: Arc<ToolRegistry>,
    max_history: usize,
}

impl AgentLoop {
    pub fn new(provider: Arc<dyn Provider>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            planner: Planner::new(provider.clone()),
            executor: Executor::new(registry.clone()),
            provider,
            registry,
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub async fn run(&self, user_input: &str, options: RunOptions) -> Result<AgentRunResult> {
        let mut memory = ConversationMemory::new();
        self.run_with_memory(user_input, options, &mut memory).await
    }

    pub async fn run_with_memory(
        &self,
        user_input: &str,
        options: RunOptions,
        memory: &mut ConversationMemory,
    ) -> Result<AgentRunResult> {
        let RunOptions {
            travel_context,
            prior_messages,
            cancel,
        } = options;

        memory.add_messages(prior_messages);

        let plan = self
            .planner
            .create_plan(user_input, travel_context.as_ref(), &cancel)
            .await?;
        info!("Plan for \"{}\" has {} step(s)", plan.goal, plan.steps.len());

        let travel = travel_context.unwrap_or_default();
        let ctx = ToolContext::new(&travel, &cancel);
        let steps = self.executor.execute_plan(&plan, memory, &ctx).await?;

        let synthesized = self
            .synthesize(user_input, &plan, &steps, memory, &cancel)
            .await?;
        let final_text = resolve_final_text(synthesized, primary_step(&steps));

        Ok(AgentRunResult {
            final_text,
            plan,
            steps,
        })
    }

    async fn synthesize(
        &self,
        user_input: &str,
        plan: &Plan,
        steps: &[StepExecutionResult],
        memory: &mut ConversationMemory,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let payload = json!({
            "goal": plan.goal,
            "userInput": user_input,
            "steps": steps
                .iter()
                .map(|s| json!({ "id": s.id, "action": s.action, "summary": s.summary }))
                .collect::<Vec<_>>(),
        });

        let turns = [
            ChatMessage::system(AGENT_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "{}\n\n{}",
                SYNTHESIS_INSTRUCTION,
                serde_json::to_string_pretty(&payload)?
            )),
        ];

        // max_history bounds the earlier turns only; the synthesis turns always go out.
        let mut messages = memory.get_conversation(Some(self.max_history)).to_vec();
        messages.extend(turns.iter().cloned());
        memory.add_messages(turns);

        let request = ChatRequest::new(&messages)
            .with_temperature(SYNTHESIS_TEMPERATURE)
            .with_max_tokens(SYNTHESIS_MAX_TOKENS);

        let text = match cancellable(cancel, self.provider.chat(request)).await {
            Ok(response) => response.trimmed().map(str::to_string),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!("Synthesis failed, falling back to step summary: {}", e);
                None
            }
        };

        if let Some(text) = &text {
            memory.add_message(ChatMessage::assistant(text.clone()));
        }
        Ok(text)
    }
}

pub fn primary_step(steps: &[StepExecutionResult]) -> Option<&StepExecutionResult> {
    steps
        .iter()
        .find(|s| s.action == ToolAction::CheckVisa)
        .or_else(|| steps.last())
}

pub fn resolve_final_text(
    synthesized: Option<String>,
    primary: Option<&StepExecutionResult>,
) -> String {
    synthesized
        .filter(|text| !text.trim().is_empty())
        .or_else(|| {
            primary
                .map(|step| step.summary.clone())
                .filter(|summary| !summary.trim().is_empty())
        })
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::StepInput;
    use crate::error::AgentError;
    use crate::testing::ScriptedProvider;
    use crate::tools::{CheckVisaTool, ItineraryTool};
    use crate::traits::Role;

    fn agent(provider: Arc<ScriptedProvider>) -> AgentLoop {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CheckVisaTool::new(provider.clone())));
        registry.register(Arc::new(ItineraryTool::new(provider.clone())));
        AgentLoop::new(provider, Arc::new(registry))
    }

    fn step(id: u32, action: ToolAction, summary: &str) -> StepExecutionResult {
        StepExecutionResult {
            id,
            action,
            input: StepInput::new(),
            summary: summary.into(),
            data: None,
        }
    }

    const TWO_STEP_PLAN: &str = r#"{"goal":"Visit Japan","steps":[
        {"id":1,"action":"generate_itinerary","input":{"destination":"Japan"}},
        {"id":2,"action":"check_visa","input":{}}
    ]}"#;

    #[test]
    fn primary_prefers_check_visa() {
        let steps = vec![
            step(1, ToolAction::CheckVisa, "visa"),
            step(2, ToolAction::TravelTips, "tips"),
        ];
        assert_eq!(primary_step(&steps).unwrap().summary, "visa");

        let steps = vec![
            step(1, ToolAction::GenerateItinerary, "plan"),
            step(2, ToolAction::TravelTips, "tips"),
        ];
        assert_eq!(primary_step(&steps).unwrap().summary, "tips");
        assert!(primary_step(&[]).is_none());
    }

    #[test]
    fn final_text_fallback_chain() {
        let visa = step(1, ToolAction::CheckVisa, "visa");
        assert_eq!(
            resolve_final_text(Some("answer".into()), Some(&visa)),
            "answer"
        );
        assert_eq!(resolve_final_text(Some("  ".into()), Some(&visa)), "visa");
        assert_eq!(resolve_final_text(None, None), NO_RESPONSE);
    }

    #[tokio::test]
    async fn synthesized_answer_wins() {
        let provider = Arc::new(ScriptedProvider::new([
            TWO_STEP_PLAN,
            "Day 1: Tokyo",
            "Visa-free for 90 days",
            "Here is your trip.",
        ]));
        let agent = agent(provider.clone());
        let mut memory = ConversationMemory::new();

        let result = agent
            .run_with_memory(
                "Plan a trip to Japan",
                RunOptions {
                    prior_messages: vec![ChatMessage::user("earlier question")],
                    ..Default::default()
                },
                &mut memory,
            )
            .await
            .unwrap();

        assert_eq!(result.final_text, "Here is your trip.");
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[1].summary, "Visa-free for 90 days");

        let conversation = memory.get_conversation(None);
        assert_eq!(conversation[0].content, "earlier question");
        assert_eq!(conversation[1].role, Role::System);
        assert!(conversation[2].content.contains("\"userInput\": \"Plan a trip to Japan\""));
        assert_eq!(conversation[3].content, "Here is your trip.");
        assert_eq!(memory.step_count(), 2);

        let synthesis = &provider.requests()[3];
        assert_eq!(synthesis.max_tokens, Some(SYNTHESIS_MAX_TOKENS));
        assert_eq!(synthesis.messages.len(), 3);
    }

    #[tokio::test]
    async fn history_limit_never_drops_synthesis_turns() {
        for (max_history, expected) in [
            (0, vec![Role::System, Role::User]),
            (1, vec![Role::User, Role::System, Role::User]),
        ] {
            let provider = Arc::new(ScriptedProvider::new([
                r#"{"goal":"nothing","steps":[]}"#,
                "answer",
            ]));
            let agent = agent(provider.clone()).with_max_history(max_history);

            agent
                .run(
                    "hmm",
                    RunOptions {
                        prior_messages: vec![
                            ChatMessage::assistant("older"),
                            ChatMessage::user("newer"),
                        ],
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let synthesis = &provider.requests()[1];
            let roles: Vec<Role> = synthesis.messages.iter().map(|m| m.role).collect();
            assert_eq!(roles, expected, "max_history = {max_history}");
            if max_history == 1 {
                assert_eq!(synthesis.messages[0].content, "newer");
            }
        }
    }

    #[tokio::test]
    async fn blank_synthesis_falls_back_to_visa_step() {
        let provider = Arc::new(ScriptedProvider::new([
            TWO_STEP_PLAN,
            "Day 1: Tokyo",
            "Visa-free for 90 days",
            "   ",
        ]));

        let result = agent(provider)
            .run("Plan a trip to Japan", RunOptions::default())
            .await
            .unwrap();
        assert_eq!(result.final_text, "Visa-free for 90 days");
    }

    #[tokio::test]
    async fn failed_synthesis_falls_back_too() {
        let provider = Arc::new(ScriptedProvider::from_results([
            Ok(TWO_STEP_PLAN.to_string()),
            Ok("Day 1: Tokyo".to_string()),
            Ok("Visa-free for 90 days".to_string()),
            Err(AgentError::Network("reset".into())),
        ]));

        let result = agent(provider)
            .run("Plan a trip to Japan", RunOptions::default())
            .await
            .unwrap();
        assert_eq!(result.final_text, "Visa-free for 90 days");
    }

    #[tokio::test]
    async fn empty_plan_without_synthesis_has_placeholder() {
        let provider = Arc::new(ScriptedProvider::new([r#"{"goal":"nothing","steps":[]}"#, ""]));

        let result = agent(provider)
            .run("hmm", RunOptions::default())
            .await
            .unwrap();
        assert!(result.steps.is_empty());
        assert_eq!(result.final_text, "No response generated.");
    }

    #[tokio::test]
    async fn cancelled_run_reports_cancellation() {
        let provider = Arc::new(ScriptedProvider::echo());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = agent(provider)
            .run(
                "Plan a trip",
                RunOptions {
                    cancel,
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AgentError::Cancelled)));
    }

    #[test]
    fn run_result_serializes_camel_case() {
        let result = AgentRunResult {
            final_text: "done".into(),
            plan: Plan {
                goal: "g".into(),
                steps: vec![],
            },
            steps: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["finalText"], "done");
    }
}
