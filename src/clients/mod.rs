//! Outbound collaborators of the relay and the seams the pipeline talks through.

pub mod openai;
pub mod slack;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::slack::UserProfile;

/// Fetches a user's profile. `Ok(None)` means the backend answered but had no profile.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;
}
