use std::{sync::Arc, time::Duration};

use tokio::time::timeout;

use crate::{clients::Translator, models::status::TranslationOutcome};

/// Wraps the translation backend so that every failure comes back as
/// [`TranslationOutcome::Failed`] and never as text.
pub struct TranslationGateway {
    translator: Arc<dyn Translator>,
    call_timeout: Duration,
}

impl TranslationGateway {
    pub fn new(translator: Arc<dyn Translator>, call_timeout: Duration) -> Self {
        Self {
            translator,
            call_timeout,
        }
    }

    pub async fn translate(&self, text: &str) -> TranslationOutcome {
        match timeout(self.call_timeout, self.translator.translate(text)).await {
            Ok(Ok(translated)) if !translated.trim().is_empty() => {
                TranslationOutcome::Translated(translated.trim().to_string())
            }
            Ok(Ok(_)) => TranslationOutcome::Failed("backend returned empty translation".into()),
            Ok(Err(e)) => TranslationOutcome::Failed(format!("{:#}", e)),
            Err(_) => TranslationOutcome::Failed(format!(
                "translation timed out after {}ms",
                self.call_timeout.as_millis()
            )),
        }
    }
}
