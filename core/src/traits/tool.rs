use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            data: None,
        }
    }

    pub fn with_data(summary: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            summary: summary.into(),
            data: Some(data),
        }
    }
}

/// What the registry does when a tool call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The error aborts the run.
    Propagate,
    /// The error is replaced by the tool's degraded summary. Cancellation still propagates.
    Degrade,
}

impl FailurePolicy {
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Degrade)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
    pub recoverable: bool,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn action(&self) -> ToolAction;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Propagate
    }

    fn degraded_summary(&self, _input: &StepInput, _ctx: &ToolContext<'_>) -> String {
        format!("The {} tool is currently unavailable.", self.action())
    }

    async fn execute(&self, input: &StepInput, ctx: &ToolContext<'_>) -> Result<ToolResult>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.action().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
            recoverable: self.failure_policy().is_recoverable(),
        }
    }
}
