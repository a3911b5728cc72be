use std::{sync::Arc, time::Duration};

use translate_relay::{models::status::TranslationOutcome, pipeline::translation::TranslationGateway};

use crate::support::FakeTranslator;

#[tokio::test]
async fn test_successful_translation_is_trimmed() {
    let gateway = TranslationGateway::new(
        Arc::new(FakeTranslator::replying("  Hello  \n")),
        Duration::from_secs(1),
    );

    assert_eq!(
        gateway.translate("你好").await,
        TranslationOutcome::Translated("Hello".to_string())
    );
}

#[tokio::test]
async fn test_backend_error_is_a_failed_outcome() {
    let gateway = TranslationGateway::new(
        Arc::new(FakeTranslator::failing("rate limited")),
        Duration::from_secs(1),
    );

    match gateway.translate("你好").await {
        TranslationOutcome::Failed(reason) => assert!(reason.contains("rate limited")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_translation_is_a_failure() {
    let gateway = TranslationGateway::new(
        Arc::new(FakeTranslator::replying("   ")),
        Duration::from_secs(1),
    );

    assert!(matches!(
        gateway.translate("你好").await,
        TranslationOutcome::Failed(_)
    ));
}

#[tokio::test]
async fn test_timeout_is_a_failure() {
    let gateway = TranslationGateway::new(
        Arc::new(FakeTranslator::slow("Hello", Duration::from_secs(30))),
        Duration::from_millis(50),
    );

    match gateway.translate("你好").await {
        TranslationOutcome::Failed(reason) => assert!(reason.contains("timed out")),
        other => panic!("expected timeout failure, got {:?}", other),
    }
}
