use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, StatusCode,
};
use shared::{
    domain::Profile,
    protocol::{GithubErrorBody, GithubUserPayload},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientBuildError, LookupError};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("profile-lookup/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, LookupError>;
}

pub struct GithubProfileClient {
    http: Client,
    base_url: Url,
}

impl GithubProfileClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::UnsupportedBaseUrl(base_url.to_string()));
        }
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON_MEDIA_TYPE));
        let http = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn github() -> Result<Self, ClientBuildError> {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/users/{username}` with the username encoded as one path segment.
    pub fn user_url(&self, username: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(username);
        }
        url
    }
}

#[async_trait]
impl ProfileFetcher for GithubProfileClient {
    async fn fetch_profile(&self, username: &str) -> Result<Profile, LookupError> {
        if username.trim().is_empty() {
            return Err(LookupError::EmptyUsername);
        }
        // Dot segments are collapsed by URL normalization and would hit `/users`.
        if matches!(username, "." | "..") {
            return Err(LookupError::InvalidUsername {
                username: username.to_string(),
            });
        }

        let url = self.user_url(username);
        debug!(%url, "requesting profile");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                username: username.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                username: username.to_string(),
            });
        }
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(username, %err, "failed to read error response body");
                    String::new()
                }
            };
            let detail = serde_json::from_str::<GithubErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(username, status = status.as_u16(), %detail, "profile lookup rejected");
            return Err(LookupError::RequestFailed {
                username: username.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| LookupError::Transport {
                username: username.to_string(),
                source,
            })?;
        let payload: GithubUserPayload = serde_json::from_slice(&body)
            .map_err(|err| LookupError::malformed(username, err))?;
        Profile::try_from(payload).map_err(|err| LookupError::invalid_profile(username, err))
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
