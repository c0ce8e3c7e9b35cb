use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::providers::{OllamaProvider, OpenAIProvider};
use crate::traits::Provider;
use std::sync::Arc;

const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY", "OPENAI_KEY", "TRIPMATE_OPENAI_API_KEY"];

pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider_name = config.provider.as_deref().unwrap_or("openai");

    match provider_name.to_lowercase().as_str() {
        "ollama" => {
            let mut provider = OllamaProvider::new().with_model(config.model.clone());
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        "openai" => {
            let api_key = resolve_api_key_with_fallback(OPENAI_KEY_VARS, &config.api_key)?;
            let mut provider = OpenAIProvider::new(api_key).with_model(config.model.clone());
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Arc::new(provider))
        }
        _ => Err(AgentError::Config(format!(
            "Unknown provider: {}. Available: openai, ollama",
            provider_name
        ))),
    }
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    let from_env = env_vars
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|key| !key.is_empty()));

    match from_env {
        Some(key) => Ok(key),
        None if !config_key.is_empty() => Ok(config_key.to_string()),
        None => Err(AgentError::Config(format!(
            "No API key found. Set one of {} or run 'tripmate onboard'.",
            env_vars.join(", ")
        ))),
    }
}
