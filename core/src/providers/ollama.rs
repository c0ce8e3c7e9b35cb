use crate::error::{AgentError, Result};
use crate::providers::{status_error, tool_result_block, tool_results_turn};
use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: Option<String>,
    #[serde(default)]
    thinking: Option<String>,
}

pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn convert_messages(&self, messages: &[ChatMessage]) -> Vec<OllamaMessage> {
        let mut result = Vec::new();
        let mut tool_results_buffer: Vec<String> = Vec::new();

        for m in messages {
            if m.role == Role::Tool {
                tool_results_buffer.push(tool_result_block(m));
                continue;
            }

            flush_tool_results(&mut result, &mut tool_results_buffer);
            result.push(OllamaMessage {
                role: m.role.as_str(),
                content: m.content.clone(),
            });
        }

        flush_tool_results(&mut result, &mut tool_results_buffer);
        result
    }
}

fn flush_tool_results(result: &mut Vec<OllamaMessage>, buffer: &mut Vec<String>) {
    if buffer.is_empty() {
        return;
    }

    result.push(OllamaMessage {
        role: "user",
        content: tool_results_turn(buffer),
    });
    buffer.clear();
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let options = (request.temperature.is_some() || request.max_tokens.is_some()).then(|| {
            OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }
        });

        let ollama_request = OllamaRequest {
            model: self.model.clone(),
            messages: self.convert_messages(request.messages),
            options,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ollama_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error("Ollama", status, error_text));
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to decode Ollama response: {}", e))
        })?;

        let message = ollama_response.message;
        let text = match message.content {
            Some(content) if !content.is_empty() => Some(content),
            _ => message.thinking.filter(|t| !t.is_empty()),
        };

        Ok(ChatResponse { text })
    }
}
