use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A validated snapshot of a GitHub user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: Url,
    pub profile_url: Url,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub public_repo_count: u32,
    pub follower_count: u32,
    pub following_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Name shown as the profile heading: the display name, falling back to the login.
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }
}
