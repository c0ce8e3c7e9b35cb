use crate::error::{AgentError, Result};
use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, Role};
use crate::weather::{DailyForecast, GeoLocation, WeatherService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl RecordedRequest {
    pub fn last_user(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn from_results(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::from_results(std::iter::empty())
    }

    pub fn failing(error: AgentError) -> Self {
        Self::from_results([Err(error)])
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let recorded = RecordedRequest {
            messages: request.messages.to_vec(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let echo = recorded.last_user().to_string();
        self.requests.lock().unwrap().push(recorded);

        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply.map(ChatResponse::text),
            None => Ok(ChatResponse::text(echo)),
        }
    }
}

pub struct StaticWeather {
    pub location: Option<GeoLocation>,
    pub forecast: Option<DailyForecast>,
}

#[async_trait]
impl WeatherService for StaticWeather {
    async fn geocode(&self, _name: &str) -> Result<Option<GeoLocation>> {
        Ok(self.location.clone())
    }

    async fn forecast(&self, _location: &GeoLocation, _days: u8) -> Result<DailyForecast> {
        self.forecast
            .clone()
            .ok_or_else(|| AgentError::Weather("forecast service returned 503".into()))
    }
}
