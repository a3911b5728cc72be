use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::{models::retry::RetryConfig, pipeline::router::RouterSettings};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(alias = "slack_trans_bot_token")]
    pub slack_bot_token: String,
    pub slack_debug_bot_token: String,
    #[serde(alias = "openai_token")]
    pub openai_api_key: String,

    pub canonical_app_id: String,
    pub debug_channel_id: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_slack_api_base")]
    pub slack_api_base: String,
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    #[serde(default = "default_translation_max_tokens")]
    pub translation_max_tokens: u32,

    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    #[serde(default = "default_english_threshold")]
    pub english_threshold: f64,
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,

    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,
}

fn default_server_port() -> u16 {
    5002
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_translation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_translation_max_tokens() -> u32 {
    2000
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

fn default_english_threshold() -> f64 {
    0.1
}

fn default_dedup_capacity() -> usize {
    100
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_initial_retry_delay_ms() -> u64 {
    200
}

fn default_max_retry_delay_ms() -> u64 {
    2000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        let required = [
            ("SLACK_BOT_TOKEN", &self.slack_bot_token),
            ("SLACK_DEBUG_BOT_TOKEN", &self.slack_debug_bot_token),
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("CANONICAL_APP_ID", &self.canonical_app_id),
            ("DEBUG_CHANNEL_ID", &self.debug_channel_id),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow!("{} must not be blank", name));
            }
        }

        if !(self.english_threshold > 0.0 && self.english_threshold <= 1.0) {
            return Err(anyhow!("ENGLISH_THRESHOLD must be within (0, 1]"));
        }

        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retry_attempts.max(1),
            initial_delay_ms: self.initial_retry_delay_ms,
            max_delay_ms: self.max_retry_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier.max(1),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms.max(1))
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms.max(1))
    }

    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            canonical_app_id: self.canonical_app_id.clone(),
            mirror_channel_id: self.debug_channel_id.clone(),
            call_timeout: self.call_timeout(),
        }
    }
}
