use serde::{Deserialize, Serialize};

use crate::models::error::ValidationError;

/// Body of a Slack Events API delivery, minus the verification handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub api_app_id: String,

    #[serde(default)]
    pub event: Option<RawEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_msg_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Message,
    Other,
}

impl EventType {
    pub fn from_raw(event_type: &str) -> Self {
        match event_type {
            "message" => EventType::Message,
            _ => EventType::Other,
        }
    }
}

/// A message event normalised from the envelope. `message_id` is the idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub event_type: EventType,
    pub subtype: Option<String>,
    pub message_id: String,
    pub sender_id: String,
    pub is_bot: bool,
    pub channel_id: String,
    pub text: String,
    pub origin_app_id: String,
}

impl InboundEvent {
    /// Only plain user messages are relayed; edits, joins and bot posts carry a subtype.
    pub fn is_plain_message(&self) -> bool {
        self.event_type == EventType::Message && self.subtype.is_none()
    }

    /// Checks the fields a message needs before it may enter dedup and translation.
    pub fn validate_message(&self) -> Result<(), ValidationError> {
        if self.message_id.trim().is_empty() {
            return Err(ValidationError::MissingField("client_msg_id"));
        }
        if self.sender_id.trim().is_empty() {
            return Err(ValidationError::MissingField("user"));
        }
        if self.channel_id.trim().is_empty() {
            return Err(ValidationError::MissingField("channel"));
        }
        Ok(())
    }
}

impl TryFrom<EventEnvelope> for InboundEvent {
    type Error = ValidationError;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        let raw = envelope.event.ok_or(ValidationError::MissingEvent)?;

        Ok(Self {
            event_type: EventType::from_raw(&raw.event_type),
            is_bot: raw.bot_id.is_some() || raw.subtype.as_deref() == Some("bot_message"),
            subtype: raw.subtype,
            message_id: raw.client_msg_id.unwrap_or_default(),
            sender_id: raw.user.unwrap_or_default(),
            channel_id: raw.channel.unwrap_or_default(),
            text: raw.text.unwrap_or_default(),
            origin_app_id: envelope.api_app_id,
        })
    }
}
