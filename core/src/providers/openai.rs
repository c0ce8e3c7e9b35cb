use crate::error::{AgentError, Result};
use crate::providers::{status_error, tool_result_block, tool_results_turn};
use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'a str,
    content: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    // Tool-role turns need a tool_call_id this client never has, so they go
    // out as a single user turn instead.
    fn convert_messages<'a>(&self, messages: &'a [ChatMessage]) -> Vec<OpenAIMessage<'a>> {
        let mut result = Vec::new();
        let mut tool_results: Vec<String> = Vec::new();

        for m in messages {
            if m.role == Role::Tool {
                tool_results.push(tool_result_block(m));
                continue;
            }

            flush_tool_results(&mut result, &mut tool_results);
            result.push(OpenAIMessage {
                role: m.role.as_str(),
                content: Cow::Borrowed(&m.content),
                name: m.name.as_deref(),
            });
        }

        flush_tool_results(&mut result, &mut tool_results);
        result
    }
}

fn flush_tool_results(result: &mut Vec<OpenAIMessage<'_>>, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }

    result.push(OpenAIMessage {
        role: Role::User.as_str(),
        content: Cow::Owned(tool_results_turn(buffer)),
        name: None,
    });
    buffer.clear();
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let openai_request = OpenAIRequest {
            model: &self.model,
            messages: self.convert_messages(request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error("OpenAI", status, error_text));
        }

        let openai_response: OpenAIResponse = response.json().await.map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to decode OpenAI response: {}", e))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::InvalidResponse("No choices in response".to_string()))?;

        Ok(ChatResponse {
            text: choice.message.content,
        })
    }
}
