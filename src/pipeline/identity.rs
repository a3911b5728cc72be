use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::time::timeout;

use crate::{
    clients::ProfileLookup,
    pipeline::sink::{RelayEvent, RelaySink},
};

/// Resolves user ids to display names, memoized for the life of the process.
pub struct IdentityResolver {
    lookup: Arc<dyn ProfileLookup>,
    call_timeout: Duration,
    names: Mutex<HashMap<String, String>>,
}

impl IdentityResolver {
    pub fn new(lookup: Arc<dyn ProfileLookup>, call_timeout: Duration) -> Self {
        Self {
            lookup,
            call_timeout,
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Never fails: display name, then real name, then the raw id.
    /// A backend error or timeout falls back without memoizing so a later event can retry.
    pub async fn resolve(&self, user_id: &str, sink: &dyn RelaySink) -> String {
        if let Some(name) = self.cached(user_id) {
            return name;
        }

        let lookup = timeout(self.call_timeout, self.lookup.fetch_profile(user_id)).await;

        let profile = match lookup {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                sink.record(RelayEvent::IdentityFallback {
                    user_id: user_id.to_string(),
                    reason: e.to_string(),
                });
                return user_id.to_string();
            }
            Err(_) => {
                sink.record(RelayEvent::IdentityFallback {
                    user_id: user_id.to_string(),
                    reason: "profile lookup timed out".to_string(),
                });
                return user_id.to_string();
            }
        };

        let name = match profile.as_ref().and_then(|p| p.preferred_name()) {
            Some(name) => name.to_string(),
            None => {
                sink.record(RelayEvent::IdentityFallback {
                    user_id: user_id.to_string(),
                    reason: "profile has no usable name".to_string(),
                });
                user_id.to_string()
            }
        };

        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.to_string())
            .or_insert(name)
            .clone()
    }

    pub fn cached(&self, user_id: &str) -> Option<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    pub fn cached_len(&self) -> usize {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
