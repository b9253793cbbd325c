use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{domain::Profile, error::ProfileValidationError};

/// Body of `GET /users/{username}`. Only the consumed fields are modelled;
/// everything else in the response is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubUserPayload {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub public_repos: Option<u32>,
    pub followers: Option<u32>,
    pub following: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Error body GitHub returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl TryFrom<GithubUserPayload> for Profile {
    type Error = ProfileValidationError;

    fn try_from(payload: GithubUserPayload) -> Result<Self, Self::Error> {
        let login = non_blank(payload.login).ok_or(ProfileValidationError::MissingField("login"))?;
        let avatar_url = required_url("avatar_url", payload.avatar_url)?;
        let profile_url = required_url("html_url", payload.html_url)?;

        Ok(Profile {
            login,
            avatar_url,
            profile_url,
            display_name: non_blank(payload.name),
            bio: non_blank(payload.bio),
            location: non_blank(payload.location),
            public_repo_count: payload.public_repos.unwrap_or_default(),
            follower_count: payload.followers.unwrap_or_default(),
            following_count: payload.following.unwrap_or_default(),
            created_at: payload.created_at,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_url(field: &'static str, value: Option<String>) -> Result<Url, ProfileValidationError> {
    let raw = non_blank(value).ok_or(ProfileValidationError::MissingField(field))?;
    Url::parse(&raw).map_err(|_| ProfileValidationError::InvalidUrl { field, value: raw })
}
