use super::*;

use std::{collections::HashMap, io::Write};

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write settings");
    file
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = load_settings_from(&dir.path().join(DEFAULT_SETTINGS_FILE), no_env);

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.initial_username, "buckets24");
    assert_eq!(settings.debounce_ms, 500);
    assert_eq!(settings.api_base_url, "https://api.github.com");
    assert_eq!(settings.stale_policy, StalePolicy::DiscardStale);
}

#[test]
fn file_values_override_defaults() {
    let file = settings_file(
        r#"
api_base_url = "https://ghe.example.com/api/v3"
username = "octocat"
debounce_ms = 250
stale_policy = "last-arrival-wins"
"#,
    );
    let settings = load_settings_from(file.path(), no_env);

    assert_eq!(settings.api_base_url, "https://ghe.example.com/api/v3");
    assert_eq!(settings.initial_username, "octocat");
    assert_eq!(settings.debounce_ms, 250);
    assert_eq!(settings.stale_policy, StalePolicy::LastArrivalWins);
    assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let file = settings_file("username = \"octocat\"\ndebounce_ms = 250\n");
    let env = env_from(&[
        ("PROFILE_LOOKUP_USERNAME", "from-env"),
        ("APP__USERNAME", "from-app-env"),
        ("PROFILE_LOOKUP_DEBOUNCE_MS", "900"),
        ("APP__STALE_POLICY", "Cancel-Superseded"),
    ]);
    let settings = load_settings_from(file.path(), env);

    assert_eq!(settings.initial_username, "from-app-env");
    assert_eq!(settings.debounce_ms, 900);
    assert_eq!(settings.stale_policy, StalePolicy::CancelSuperseded);
}

#[test]
fn invalid_env_values_are_ignored() {
    let env = env_from(&[
        ("PROFILE_LOOKUP_DEBOUNCE_MS", "soon"),
        ("PROFILE_LOOKUP_STALE_POLICY", "whatever"),
    ]);
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = load_settings_from(&dir.path().join(DEFAULT_SETTINGS_FILE), env);

    assert_eq!(settings.debounce_ms, 500);
    assert_eq!(settings.stale_policy, StalePolicy::DiscardStale);
}

#[test]
fn invalid_file_value_only_drops_that_key() {
    let file = settings_file(
        "username = \"octocat\"\ndebounce_ms = \"not a number\"\nstale_policy = \"sometimes\"\n",
    );
    let settings = load_settings_from(file.path(), no_env);

    assert_eq!(settings.initial_username, "octocat");
    assert_eq!(settings.debounce_ms, 500);
    assert_eq!(settings.stale_policy, StalePolicy::DiscardStale);
}

#[test]
fn negative_debounce_in_file_is_ignored() {
    let file = settings_file("debounce_ms = -5\nuser_agent = \"custom-agent\"\n");
    let settings = load_settings_from(file.path(), no_env);

    assert_eq!(settings.debounce_ms, 500);
    assert_eq!(settings.user_agent, "custom-agent");
}

#[test]
fn malformed_toml_file_is_ignored() {
    let file = settings_file("username = \"octocat\"\nthis is not toml\n");
    let settings = load_settings_from(file.path(), no_env);
    assert_eq!(settings, Settings::default());
}

#[test]
fn lookup_config_carries_settings() {
    let settings = Settings {
        initial_username: "octocat".into(),
        debounce_ms: 120,
        stale_policy: StalePolicy::CancelSuperseded,
        ..Settings::default()
    };
    let config = settings.lookup_config();

    assert_eq!(config.initial_username, "octocat");
    assert_eq!(config.debounce, Duration::from_millis(120));
    assert_eq!(config.stale_policy, StaleResponsePolicy::CancelSuperseded);
}
