use std::fmt::{Display, Formatter, Result};

use crate::models::error::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    NotNeeded,
    Translated(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Invalid(ValidationError),
    BotMessage,
    UnsupportedEvent,
}

/// Terminal state of one webhook delivery through the router.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingStatus {
    Verification { challenge: serde_json::Value },
    NotProcessed(SkipReason),
    AlreadyProcessed,
    NoTranslationNeeded,
    TranslationFailed,
    Forwarded { delivered: usize, failed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Primary,
    Mirror,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SkipReason::Invalid(e) => write!(f, "invalid: {}", e),
            SkipReason::BotMessage => write!(f, "bot_message"),
            SkipReason::UnsupportedEvent => write!(f, "unsupported_event"),
        }
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ProcessingStatus::Verification { .. } => write!(f, "verification"),
            ProcessingStatus::NotProcessed(_) => write!(f, "not_processed"),
            ProcessingStatus::AlreadyProcessed => write!(f, "already_processed"),
            ProcessingStatus::NoTranslationNeeded => write!(f, "no_translation_needed"),
            ProcessingStatus::TranslationFailed => write!(f, "translation_failed"),
            ProcessingStatus::Forwarded { .. } => write!(f, "forwarded"),
        }
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Destination::Primary => write!(f, "primary"),
            Destination::Mirror => write!(f, "mirror"),
        }
    }
}
