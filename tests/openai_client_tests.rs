use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use translate_relay::{
    clients::{Translator, openai::OpenAiClient},
    models::retry::RetryConfig,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn client(server: &MockServer) -> Result<OpenAiClient> {
    OpenAiClient::with_settings(
        &server.uri(),
        "sk-test",
        "gpt-3.5-turbo",
        2000,
        Duration::from_secs(2),
        RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 10,
            max_delay_ms: 20,
            backoff_multiplier: 2,
        },
    )
}

/// Test: Translation request carries the instruction and returns trimmed content
#[tokio::test]
async fn test_translate_success() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 2000,
            "temperature": 0.0,
            "messages": [{
                "role": "user",
                "content": "Translate the following text to English:\n\n你好\n\n"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Hello\n" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translated = client(&server)?.translate("你好").await?;
    assert_eq!(translated, "Hello");

    Ok(())
}

/// Test: Server errors are retried and then surfaced
#[tokio::test]
async fn test_translate_server_error_is_retried() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(2)
        .mount(&server)
        .await;

    let error = client(&server)?
        .translate("你好")
        .await
        .expect_err("translation should fail");
    assert!(error.to_string().contains("500"));

    Ok(())
}

/// Test: A response without choices is an error, not an empty translation
#[tokio::test]
async fn test_translate_empty_choices_is_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    assert!(client(&server)?.translate("你好").await.is_err());

    Ok(())
}

#[test]
fn test_blank_api_key_is_rejected() {
    let result = OpenAiClient::with_settings(
        "http://localhost",
        "  ",
        "gpt-3.5-turbo",
        100,
        Duration::from_secs(1),
        RetryConfig::default(),
    );
    assert!(result.is_err());
}
