use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use translate_relay::{
    clients::{Notifier, ProfileLookup, Translator},
    models::slack::UserProfile,
    pipeline::{
        dedup::DedupCache,
        identity::IdentityResolver,
        language::LanguageHeuristic,
        router::{EventRouter, RouterSettings},
        sink::MemorySink,
        translation::TranslationGateway,
    },
};

pub const CANONICAL_APP: &str = "CANON";
pub const MIRROR_CHANNEL: &str = "CDEBUG";

#[derive(Default)]
pub struct FakeProfiles {
    profiles: HashMap<String, UserProfile>,
    pub calls: AtomicU32,
    pub fail: bool,
}

impl FakeProfiles {
    pub fn with_display_name(user_id: &str, name: &str) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            user_id.to_string(),
            UserProfile {
                display_name: Some(name.to_string()),
                real_name: None,
            },
        );
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn with_profile(user_id: &str, profile: UserProfile) -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(user_id.to_string(), profile);
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProfileLookup for FakeProfiles {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("profile backend unavailable"));
        }
        Ok(self.profiles.get(user_id).cloned())
    }
}

pub struct FakeTranslator {
    reply: Result<String, String>,
    delay: Duration,
    pub calls: AtomicU32,
}

impl FakeTranslator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, _text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    posts: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("channel_not_found"));
        }
        self.posts
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub router: Arc<EventRouter>,
    pub profiles: Arc<FakeProfiles>,
    pub translator: Arc<FakeTranslator>,
    pub primary: Arc<RecordingNotifier>,
    pub mirror: Arc<RecordingNotifier>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new(translator: FakeTranslator) -> Self {
        Self::build(
            FakeProfiles::with_display_name("U1", "Alice"),
            translator,
            RecordingNotifier::default(),
            RecordingNotifier::default(),
        )
    }

    pub fn build(
        profiles: FakeProfiles,
        translator: FakeTranslator,
        primary: RecordingNotifier,
        mirror: RecordingNotifier,
    ) -> Self {
        let profiles = Arc::new(profiles);
        let translator = Arc::new(translator);
        let primary = Arc::new(primary);
        let mirror = Arc::new(mirror);
        let sink = Arc::new(MemorySink::default());
        let call_timeout = Duration::from_secs(5);

        let router = EventRouter::new(
            RouterSettings {
                canonical_app_id: CANONICAL_APP.to_string(),
                mirror_channel_id: MIRROR_CHANNEL.to_string(),
                call_timeout,
            },
            Arc::new(DedupCache::default()),
            LanguageHeuristic::default(),
            TranslationGateway::new(translator.clone(), call_timeout),
            Arc::new(IdentityResolver::new(profiles.clone(), call_timeout)),
            primary.clone(),
            mirror.clone(),
            sink.clone(),
        );

        Self {
            router: Arc::new(router),
            profiles,
            translator,
            primary,
            mirror,
            sink,
        }
    }

    pub fn total_posts(&self) -> usize {
        self.primary.posts().len() + self.mirror.posts().len()
    }
}

pub fn message_event(app_id: &str, message_id: &str, text: &str) -> Value {
    json!({
        "api_app_id": app_id,
        "event": {
            "type": "message",
            "client_msg_id": message_id,
            "user": "U1",
            "text": text,
            "channel": "C1"
        }
    })
}
