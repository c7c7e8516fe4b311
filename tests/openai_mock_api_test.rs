//! Mock API tests for the synchronous OpenAI adapters
//!
//! Response bodies follow the OpenAI API reference for
//! `/v1/images/generations` and `/v1/chat/completions`.

mod support;

use serde_json::json;
use unigen::ErrorKind;
use unigen::prelude::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{mock_config, stock_orchestrator};

const KEY: &str = "sk-test0123456789abcdef";

fn create_error_response(error_type: &str, message: &str) -> serde_json::Value {
    json!({"error": {"message": message, "type": error_type, "param": null, "code": null}})
}

#[tokio::test]
async fn test_image_generation_is_answered_on_submit() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("Authorization", format!("Bearer {KEY}").as_str()))
        .and(body_partial_json(json!({"model": "dall-e-3", "size": "1792x1024", "n": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1589478378,
            "data": [{"url": "https://oaidalleapiprodscus.example/img-1.png", "revised_prompt": "x"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let request = GenerationRequest::image("dall-e-3", "a red bicycle").with_aspect_ratio("16:9");
    let handle = service.create_task(&request).await.unwrap();
    let result = service.get_task_status(&request.with_task(handle)).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.url(), Some("https://oaidalleapiprodscus.example/img-1.png"));
}

#[tokio::test]
async fn test_image_base64_becomes_data_uri() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1713833628,
            "data": [{"b64_json": "iVBORw0KGgo"}]
        })))
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let result = service
        .generate(&GenerationRequest::image("gpt-image-1", "a red bicycle"))
        .await
        .unwrap();
    assert_eq!(result.url(), Some("data:image/png;base64,iVBORw0KGgo"));
}

#[tokio::test]
async fn test_rejected_key_is_credentials_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(create_error_response(
            "invalid_request_error",
            "Incorrect API key provided",
        )))
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let err = service
        .create_task(&GenerationRequest::image("dall-e-3", "a red bicycle"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
    assert_eq!(err.provider(), Some(ProviderId::OpenAi));
    assert!(err.to_string().contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_rate_limit_is_retryable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(create_error_response(
            "rate_limit_exceeded",
            "Rate limit reached",
        )))
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let err = service
        .create_task(&GenerationRequest::text("gpt-4o-mini", "hello"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_chat_completion_text() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "max_tokens": 32})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1677652288,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello! How can I help you today?"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let result = service
        .generate(&GenerationRequest::text("gpt-4o-mini", "Hello").with_max_tokens(32))
        .await
        .unwrap();

    assert_eq!(result.task_id, "chatcmpl-123");
    assert_eq!(result.modality, Modality::Text);
    assert_eq!(result.text(), Some("Hello! How can I help you today?"));
}

#[tokio::test]
async fn test_content_filter_is_failed_result() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-456",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "content_filter"}]
        })))
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let result = service
        .generate(&GenerationRequest::text("gpt-4o-mini", "something"))
        .await
        .unwrap();
    assert_eq!(result.status(), TaskStatus::Failed);
    assert_eq!(result.failure_reason(), Some("response blocked by content filter"));
}

#[tokio::test]
async fn test_bad_parameters_are_invalid_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(create_error_response(
            "invalid_request_error",
            "Invalid size",
        )))
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(mock_config(ProviderId::OpenAi, KEY, &mock_server.uri()), 5);
    let err = service
        .create_task(&GenerationRequest::image("dall-e-3", "x").with_size("5x5"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_malformed_key_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = stock_orchestrator(
        mock_config(ProviderId::OpenAi, "not-an-sk-key", &mock_server.uri()),
        5,
    );
    let err = service
        .create_task(&GenerationRequest::text("gpt-4o-mini", "hello"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}
