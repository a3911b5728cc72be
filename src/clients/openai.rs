use std::time::Duration;

use anyhow::{Context, Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    clients::Translator,
    config::Config,
    models::{
        openai::{ChatCompletionRequest, ChatCompletionResponse},
        retry::RetryConfig,
    },
    utils::retry_with_backoff,
};

pub struct OpenAiClient {
    http_client: Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    retry_config: RetryConfig,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_settings(
            &config.openai_api_base,
            &config.openai_api_key,
            &config.translation_model,
            config.translation_max_tokens,
            config.http_timeout(),
            config.retry_config(),
        )
    }

    pub fn with_settings(
        api_base: &str,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout: Duration,
        retry_config: RetryConfig,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("Translation API key is empty"));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create translation HTTP client")?;

        info!(api_base, model, "Translation client initialized");

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            max_tokens,
            retry_config,
        })
    }

    async fn complete_once(&self, request: &ChatCompletionRequest) -> Result<String, Error> {
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "chat completion returned status {}: {}",
                status,
                error_text
            ));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(anyhow!("chat completion returned no content"));
        }

        Ok(content)
    }
}

#[async_trait]
impl Translator for OpenAiClient {
    async fn translate(&self, text: &str) -> Result<String> {
        debug!(chars = text.chars().count(), "Requesting translation");

        let request =
            ChatCompletionRequest::translate_to_english(&self.model, self.max_tokens, text);

        retry_with_backoff(&self.retry_config, "chat.completions", || {
            self.complete_once(&request)
        })
        .await
    }
}
