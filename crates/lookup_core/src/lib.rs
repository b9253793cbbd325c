pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetcher;

pub use controller::{LookupConfig, LookupState, ProfileLookupController, StaleResponsePolicy};
pub use debounce::Debouncer;
pub use error::{ClientBuildError, LookupError};
pub use fetcher::{GithubProfileClient, ProfileFetcher, DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT};
pub use shared::domain::Profile;
