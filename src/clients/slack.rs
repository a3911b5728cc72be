use std::time::Duration;

use anyhow::{Context, Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    clients::{Notifier, ProfileLookup},
    models::{
        retry::RetryConfig,
        slack::{PostMessageRequest, PostMessageResponse, ProfileResponse, UserProfile},
    },
    utils::retry_with_backoff,
};

#[derive(Clone)]
pub struct SlackClient {
    http_client: Client,
    api_base: String,
    bot_token: String,
    retry_config: RetryConfig,
}

impl SlackClient {
    pub fn new(
        api_base: &str,
        bot_token: &str,
        timeout: Duration,
        retry_config: RetryConfig,
    ) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Slack HTTP client")?;

        info!(api_base, "Slack client initialized");

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.trim().to_string(),
            retry_config,
        })
    }

    async fn fetch_profile_once(&self, user_id: &str) -> Result<Option<UserProfile>, Error> {
        let url = format!("{}/users.profile.get", self.api_base);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.bot_token)
            .query(&[("user", user_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("users.profile.get returned status {}", status));
        }

        let body: ProfileResponse = response
            .json()
            .await
            .context("Failed to parse users.profile.get response")?;

        if !body.ok {
            let error = body.error.unwrap_or_else(|| "unknown_error".to_string());
            // Unknown users are an answer, not a failure.
            if error == "user_not_found" {
                return Ok(None);
            }
            return Err(anyhow!("users.profile.get failed: {}", error));
        }

        Ok(body.profile)
    }
}

#[async_trait]
impl ProfileLookup for SlackClient {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        debug!(user_id, "Fetching Slack user profile");

        retry_with_backoff(&self.retry_config, "users.profile.get", || {
            self.fetch_profile_once(user_id)
        })
        .await
    }
}

#[async_trait]
impl Notifier for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let url = format!("{}/chat.postMessage", self.api_base);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "chat.postMessage returned status {}: {}",
                status,
                error_text
            ));
        }

        let body: PostMessageResponse = response
            .json()
            .await
            .context("Failed to parse chat.postMessage response")?;

        if !body.ok {
            return Err(anyhow!(
                "chat.postMessage failed: {}",
                body.error.unwrap_or_else(|| "unknown_error".to_string())
            ));
        }

        debug!(channel, ts = ?body.ts, "Slack message posted");
        Ok(())
    }
}
