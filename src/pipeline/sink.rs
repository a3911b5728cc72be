use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::{
    models::status::{Destination, SkipReason},
    pipeline::language::Classification,
};

/// Observations emitted by the router. The router decides; sinks decide how loud to be.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    VerificationEchoed,
    Skipped {
        reason: SkipReason,
    },
    Duplicate {
        message_id: String,
    },
    Classified {
        message_id: String,
        classification: Classification,
    },
    TranslationFailed {
        message_id: String,
        reason: String,
    },
    IdentityFallback {
        user_id: String,
        reason: String,
    },
    Delivered {
        message_id: String,
        destination: Destination,
        channel: String,
    },
    DeliveryFailed {
        message_id: String,
        destination: Destination,
        channel: String,
        error: String,
    },
}

pub trait RelaySink: Send + Sync {
    fn record(&self, event: RelayEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RelaySink for TracingSink {
    fn record(&self, event: RelayEvent) {
        match event {
            RelayEvent::VerificationEchoed => debug!("Answered URL verification challenge"),
            RelayEvent::Skipped { reason } => debug!(reason = %reason, "Event not processed"),
            RelayEvent::Duplicate { message_id } => {
                info!(message_id = %message_id, "Message already processed, skipping")
            }
            RelayEvent::Classified {
                message_id,
                classification,
            } => debug!(
                message_id = %message_id,
                non_ascii = classification.non_ascii,
                total = classification.total,
                ratio = classification.ratio,
                english = classification.english,
                "Classified message language"
            ),
            RelayEvent::TranslationFailed { message_id, reason } => {
                warn!(message_id = %message_id, error = %reason, "Translation failed, not forwarding")
            }
            RelayEvent::IdentityFallback { user_id, reason } => {
                debug!(user_id = %user_id, reason = %reason, "Falling back to raw user id")
            }
            RelayEvent::Delivered {
                message_id,
                destination,
                channel,
            } => info!(message_id = %message_id, %destination, channel = %channel, "Translated message forwarded"),
            RelayEvent::DeliveryFailed {
                message_id,
                destination,
                channel,
                error,
            } => warn!(message_id = %message_id, %destination, channel = %channel, error = %error, "Failed to forward message"),
        }
    }
}

/// Keeps every event in memory; handy for assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RelayEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<RelayEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RelaySink for MemorySink {
    fn record(&self, event: RelayEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
