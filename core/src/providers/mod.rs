pub mod factory;
pub mod ollama;
pub mod openai;

pub use factory::create_provider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;

use crate::error::AgentError;
use crate::traits::ChatMessage;
use reqwest::StatusCode;

pub(crate) fn status_error(provider: &str, status: StatusCode, body: String) -> AgentError {
    let detail = format!("{} API error {}: {}", provider, status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(detail),
        _ => AgentError::Network(detail),
    }
}

pub(crate) fn tool_result_block(message: &ChatMessage) -> String {
    format!(
        "<tool_result name=\"{}\">\n{}\n</tool_result>",
        message.name.as_deref().unwrap_or("tool"),
        message.content
    )
}

pub(crate) fn tool_results_turn(blocks: &[String]) -> String {
    format!("[Tool results]\n{}", blocks.join("\n"))
}
