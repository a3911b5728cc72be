use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::{
    clients::Notifier,
    models::{
        error::ValidationError,
        event::{EventEnvelope, InboundEvent},
        status::{Destination, ProcessingStatus, SkipReason, TranslationOutcome},
    },
    pipeline::{
        dedup::DedupCache,
        identity::IdentityResolver,
        language::LanguageHeuristic,
        sink::{RelayEvent, RelaySink},
        translation::TranslationGateway,
    },
};

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub canonical_app_id: String,
    pub mirror_channel_id: String,
    pub call_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub destination: Destination,
    pub channel: String,
    pub text: String,
}

/// Where a translated message goes: the source channel when the event came
/// from the canonical app, and the mirror channel always.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub primary: Option<Delivery>,
    pub mirror: Delivery,
}

impl RoutingDecision {
    pub fn decide(
        event: &InboundEvent,
        display_name: &str,
        translated: &str,
        settings: &RouterSettings,
    ) -> Self {
        let primary = (event.origin_app_id == settings.canonical_app_id).then(|| Delivery {
            destination: Destination::Primary,
            channel: event.channel_id.clone(),
            text: format!("{} said: {}", display_name, translated),
        });

        let mirror = Delivery {
            destination: Destination::Mirror,
            channel: settings.mirror_channel_id.clone(),
            text: format!(
                "In [{}], {} said: {}",
                event.channel_id, display_name, translated
            ),
        };

        Self { primary, mirror }
    }

    pub fn deliveries(self) -> Vec<Delivery> {
        self.primary.into_iter().chain(Some(self.mirror)).collect()
    }
}

pub struct EventRouter {
    settings: RouterSettings,
    dedup: Arc<DedupCache>,
    heuristic: LanguageHeuristic,
    gateway: TranslationGateway,
    identities: Arc<IdentityResolver>,
    primary: Arc<dyn Notifier>,
    mirror: Arc<dyn Notifier>,
    sink: Arc<dyn RelaySink>,
}

impl EventRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: RouterSettings,
        dedup: Arc<DedupCache>,
        heuristic: LanguageHeuristic,
        gateway: TranslationGateway,
        identities: Arc<IdentityResolver>,
        primary: Arc<dyn Notifier>,
        mirror: Arc<dyn Notifier>,
        sink: Arc<dyn RelaySink>,
    ) -> Self {
        Self {
            settings,
            dedup,
            heuristic,
            gateway,
            identities,
            primary,
            mirror,
            sink,
        }
    }

    pub fn dedup(&self) -> &DedupCache {
        &self.dedup
    }

    pub fn identities(&self) -> &IdentityResolver {
        &self.identities
    }

    pub async fn handle(&self, payload: &Value) -> ProcessingStatus {
        let span = info_span!("relay_event", trace_id = %Uuid::new_v4());
        self.run(payload).instrument(span).await
    }

    async fn run(&self, payload: &Value) -> ProcessingStatus {
        if let Some(challenge) = payload.get("challenge") {
            self.sink.record(RelayEvent::VerificationEchoed);
            return ProcessingStatus::Verification {
                challenge: challenge.clone(),
            };
        }

        let event = match parse_event(payload) {
            Ok(event) => event,
            Err(e) => return self.skip(SkipReason::Invalid(e)),
        };

        if event.is_bot {
            return self.skip(SkipReason::BotMessage);
        }

        if !event.is_plain_message() {
            return self.skip(SkipReason::UnsupportedEvent);
        }

        if let Err(e) = event.validate_message() {
            return self.skip(SkipReason::Invalid(e));
        }

        // Recorded before any slow call so a racing redelivery is suppressed too.
        if !self.dedup.check_and_add(&event.message_id) {
            self.sink.record(RelayEvent::Duplicate {
                message_id: event.message_id.clone(),
            });
            return ProcessingStatus::AlreadyProcessed;
        }

        let classification = self.heuristic.classify(&event.text);
        self.sink.record(RelayEvent::Classified {
            message_id: event.message_id.clone(),
            classification,
        });
        if classification.english {
            return ProcessingStatus::NoTranslationNeeded;
        }

        let translated = match self.gateway.translate(&event.text).await {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::NotNeeded => return ProcessingStatus::NoTranslationNeeded,
            TranslationOutcome::Failed(reason) => {
                self.sink.record(RelayEvent::TranslationFailed {
                    message_id: event.message_id.clone(),
                    reason,
                });
                return ProcessingStatus::TranslationFailed;
            }
        };

        let display_name = self
            .identities
            .resolve(&event.sender_id, self.sink.as_ref())
            .await;

        let decision =
            RoutingDecision::decide(&event, &display_name, &translated, &self.settings);

        self.deliver(&event.message_id, decision).await
    }

    async fn deliver(&self, message_id: &str, decision: RoutingDecision) -> ProcessingStatus {
        let sends = decision.deliveries().into_iter().map(|delivery| async move {
            let notifier = match delivery.destination {
                Destination::Primary => &self.primary,
                Destination::Mirror => &self.mirror,
            };

            let result = match timeout(
                self.settings.call_timeout,
                notifier.post_message(&delivery.channel, &delivery.text),
            )
            .await
            {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(format!("{:#}", e)),
                Err(_) => Err("post timed out".to_string()),
            };

            match result {
                Ok(()) => {
                    self.sink.record(RelayEvent::Delivered {
                        message_id: message_id.to_string(),
                        destination: delivery.destination,
                        channel: delivery.channel,
                    });
                    true
                }
                Err(error) => {
                    self.sink.record(RelayEvent::DeliveryFailed {
                        message_id: message_id.to_string(),
                        destination: delivery.destination,
                        channel: delivery.channel,
                        error,
                    });
                    false
                }
            }
        });

        let results = join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();

        ProcessingStatus::Forwarded {
            delivered,
            failed: results.len() - delivered,
        }
    }

    fn skip(&self, reason: SkipReason) -> ProcessingStatus {
        self.sink.record(RelayEvent::Skipped {
            reason: reason.clone(),
        });
        ProcessingStatus::NotProcessed(reason)
    }
}

fn parse_event(payload: &Value) -> Result<InboundEvent, ValidationError> {
    let envelope = EventEnvelope::deserialize(payload)
        .map_err(|e| ValidationError::Malformed(e.to_string()))?;
    InboundEvent::try_from(envelope)
}
