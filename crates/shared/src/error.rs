use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure classes a lookup collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The remote rejected the lookup or the user does not exist.
    LookupFailed,
    /// The request never produced a usable response.
    TransportFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    #[error("profile payload is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("profile payload field `{field}` is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}
