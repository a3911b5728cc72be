use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub real_name: Option<String>,
}

impl UserProfile {
    /// Display name first, then real name; blank values count as absent.
    pub fn preferred_name(&self) -> Option<&str> {
        [self.display_name.as_deref(), self.real_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub ok: bool,

    #[serde(default)]
    pub profile: Option<UserProfile>,

    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,

    #[serde(default)]
    pub ts: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}
