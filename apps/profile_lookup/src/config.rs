use std::{fs, path::Path, time::Duration};

use clap::ValueEnum;
use lookup_core::{LookupConfig, StaleResponsePolicy, DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT};
use toml::{Table, Value};
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "profile_lookup.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StalePolicy {
    #[default]
    DiscardStale,
    CancelSuperseded,
    LastArrivalWins,
}

impl From<StalePolicy> for StaleResponsePolicy {
    fn from(value: StalePolicy) -> Self {
        match value {
            StalePolicy::DiscardStale => StaleResponsePolicy::DiscardStale,
            StalePolicy::CancelSuperseded => StaleResponsePolicy::CancelSuperseded,
            StalePolicy::LastArrivalWins => StaleResponsePolicy::LastArrivalWins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub initial_username: String,
    pub debounce_ms: u64,
    pub user_agent: String,
    pub stale_policy: StalePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            initial_username: "buckets24".into(),
            debounce_ms: 500,
            user_agent: DEFAULT_USER_AGENT.into(),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl Settings {
    pub fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            initial_username: self.initial_username.clone(),
            debounce: Duration::from_millis(self.debounce_ms),
            stale_policy: self.stale_policy.into(),
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_from(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path`, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<Table>() {
            Ok(file_cfg) => apply_file_settings(&mut settings, &file_cfg),
            Err(err) => warn!(path = %path.display(), %err, "ignoring unreadable settings file"),
        }
    }

    for key in ["PROFILE_LOOKUP_API_BASE_URL", "APP__API_BASE_URL"] {
        if let Some(v) = env(key) {
            settings.api_base_url = v;
        }
    }
    for key in ["PROFILE_LOOKUP_USERNAME", "APP__USERNAME"] {
        if let Some(v) = env(key) {
            settings.initial_username = v;
        }
    }
    for key in ["PROFILE_LOOKUP_USER_AGENT", "APP__USER_AGENT"] {
        if let Some(v) = env(key) {
            settings.user_agent = v;
        }
    }
    for key in ["PROFILE_LOOKUP_DEBOUNCE_MS", "APP__DEBOUNCE_MS"] {
        if let Some(v) = env(key) {
            match v.trim().parse::<u64>() {
                Ok(parsed) => settings.debounce_ms = parsed,
                Err(err) => warn!(key, value = %v, %err, "ignoring invalid debounce setting"),
            }
        }
    }
    for key in ["PROFILE_LOOKUP_STALE_POLICY", "APP__STALE_POLICY"] {
        if let Some(v) = env(key) {
            match StalePolicy::from_str(v.trim(), true) {
                Ok(parsed) => settings.stale_policy = parsed,
                Err(err) => warn!(key, value = %v, %err, "ignoring invalid stale policy"),
            }
        }
    }

    settings
}

/// Each key is applied on its own; a bad value only drops that key.
fn apply_file_settings(settings: &mut Settings, file_cfg: &Table) {
    for (key, value) in file_cfg {
        let applied = match (key.as_str(), value) {
            ("api_base_url", Value::String(v)) => {
                settings.api_base_url = v.clone();
                true
            }
            ("username" | "initial_username", Value::String(v)) => {
                settings.initial_username = v.clone();
                true
            }
            ("user_agent", Value::String(v)) => {
                settings.user_agent = v.clone();
                true
            }
            ("debounce_ms", Value::Integer(v)) => match u64::try_from(*v) {
                Ok(ms) => {
                    settings.debounce_ms = ms;
                    true
                }
                Err(_) => false,
            },
            ("stale_policy", Value::String(v)) => match StalePolicy::from_str(v, true) {
                Ok(policy) => {
                    settings.stale_policy = policy;
                    true
                }
                Err(_) => false,
            },
            ("api_base_url" | "username" | "initial_username" | "user_agent" | "debounce_ms"
            | "stale_policy", _) => false,
            _ => {
                warn!(key, "ignoring unknown settings key");
                continue;
            }
        };
        if !applied {
            warn!(key, %value, "ignoring invalid settings value");
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
