use serde_json::json;
use tripmate_core::error::AgentError;
use tripmate_core::providers::{OllamaProvider, OpenAIProvider};
use tripmate_core::traits::{ChatMessage, ChatRequest, Provider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn openai_sends_sampling_parameters_and_reads_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.7,
            "max_tokens": 900
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Day 1: Lisbon")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new("sk-test").with_base_url(server.uri());
    let messages = [ChatMessage::system("sys"), ChatMessage::user("plan")];
    let response = provider
        .chat(
            ChatRequest::new(&messages)
                .with_temperature(0.7)
                .with_max_tokens(900),
        )
        .await
        .unwrap();

    assert_eq!(response.text_or_empty(), "Day 1: Lisbon");
}

#[tokio::test]
async fn openai_maps_unauthorized_to_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new("sk-bad").with_base_url(server.uri());
    let messages = [ChatMessage::user("hi")];
    let err = provider.chat(ChatRequest::new(&messages)).await.unwrap_err();

    assert!(matches!(err, AgentError::Auth(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn openai_maps_too_many_requests_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new("sk-test").with_base_url(server.uri());
    let messages = [ChatMessage::user("hi")];
    let err = provider.chat(ChatRequest::new(&messages)).await.unwrap_err();

    assert!(matches!(err, AgentError::RateLimited(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn openai_without_choices_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new("sk-test").with_base_url(server.uri());
    let messages = [ChatMessage::user("hi")];
    let err = provider.chat(ChatRequest::new(&messages)).await.unwrap_err();

    assert!(matches!(err, AgentError::InvalidResponse(_)));
}

#[tokio::test]
async fn ollama_is_non_streaming_and_maps_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "options": { "temperature": 0.6, "num_predict": 700 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": "Budget: 80 USD/day" },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new().with_base_url(server.uri());
    let messages = [ChatMessage::user("budget?")];
    let response = provider
        .chat(
            ChatRequest::new(&messages)
                .with_temperature(0.6)
                .with_max_tokens(700),
        )
        .await
        .unwrap();

    assert_eq!(response.text_or_empty(), "Budget: 80 USD/day");
}
