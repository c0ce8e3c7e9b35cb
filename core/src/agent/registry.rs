use crate::agent::{StepInput, ToolAction, ToolContext};
use crate::config::RetryConfig;
use crate::error::{AgentError, Result, cancellable};
use crate::traits::{FailurePolicy, Tool, ToolResult, ToolSpec};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    retry: RetryConfig,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let action = tool.action();
        self.tools.retain(|t| t.action() != action);
        self.tools.push(tool);
    }

    pub fn get(&self, action: &ToolAction) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| &t.action() == action)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the tool bound to `action`.
    ///
    /// Unknown actions yield a stub result rather than an error. Transient
    /// failures are retried per the retry policy; a tool with
    /// [`FailurePolicy::Degrade`] turns its final failure into its degraded
    /// summary. Cancellation is always returned as-is.
    pub async fn call(
        &self,
        action: &ToolAction,
        input: &StepInput,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        let Some(tool) = self.get(action) else {
            return Ok(ToolResult::summary(format!(
                "No tool implemented for action \"{}\".",
                action
            )));
        };

        match self.call_with_retry(tool.as_ref(), input, ctx).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) if tool.failure_policy() == FailurePolicy::Degrade => {
                warn!("Tool {} failed, degrading: {}", action, e);
                Ok(ToolResult::with_data(
                    tool.degraded_summary(input, ctx),
                    json!({ "error": e.to_string() }),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn call_with_retry(
        &self,
        tool: &dyn Tool,
        input: &StepInput,
        ctx: &ToolContext<'_>,
    ) -> Result<ToolResult> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match tool.execute(input, ctx).await {
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        "Tool {} attempt {}/{} failed: {}. Retrying in {:?}",
                        tool.action(),
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    cancellable(ctx.cancel, async {
                        tokio::time::sleep(delay).await;
                        Ok::<_, AgentError>(())
                    })
                    .await?;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
