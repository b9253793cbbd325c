use shared::error::{ErrorCategory, ProfileValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Enter a GitHub username to look up.")]
    EmptyUsername,
    #[error("\"{username}\" is not a valid GitHub username.")]
    InvalidUsername { username: String },
    #[error("User \"{username}\" not found.")]
    NotFound { username: String },
    #[error("Lookup for \"{username}\" failed with status {status}: {detail}")]
    RequestFailed {
        username: String,
        status: u16,
        detail: String,
    },
    #[error("Could not reach GitHub while looking up \"{username}\": {source}")]
    Transport {
        username: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GitHub returned an unusable profile for \"{username}\": {reason}")]
    MalformedPayload { username: String, reason: String },
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::EmptyUsername
            | LookupError::InvalidUsername { .. }
            | LookupError::NotFound { .. }
            | LookupError::RequestFailed { .. } => ErrorCategory::LookupFailed,
            LookupError::Transport { .. } | LookupError::MalformedPayload { .. } => {
                ErrorCategory::TransportFailed
            }
        }
    }

    pub(crate) fn malformed(username: &str, reason: impl ToString) -> Self {
        LookupError::MalformedPayload {
            username: username.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_profile(username: &str, err: ProfileValidationError) -> Self {
        Self::malformed(username, err)
    }
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("API base URL cannot carry a path: {0}")]
    UnsupportedBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
