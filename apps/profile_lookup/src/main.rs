use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use lookup_core::{GithubProfileClient, ProfileFetcher, ProfileLookupController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings, StalePolicy, DEFAULT_SETTINGS_FILE};

const QUIT_COMMAND: &str = ":q";

/// Look up GitHub profiles as you type.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Username looked up on start.
    #[arg(long)]
    username: Option<String>,
    /// Quiet period before an input change triggers a lookup.
    #[arg(long)]
    debounce_ms: Option<u64>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    user_agent: Option<String>,
    /// How responses for superseded lookups are handled.
    #[arg(long, value_enum)]
    stale_policy: Option<StalePolicy>,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Look up `--username` once and exit.
    #[arg(long)]
    once: bool,
    /// Print the profile as JSON (with `--once`).
    #[arg(long, requires = "once")]
    json: bool,
}

impl Args {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(v) = &self.username {
            settings.initial_username = v.clone();
        }
        if let Some(v) = self.debounce_ms {
            settings.debounce_ms = v;
        }
        if let Some(v) = &self.api_base_url {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = &self.user_agent {
            settings.user_agent = v.clone();
        }
        if let Some(v) = self.stale_policy {
            settings.stale_policy = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config);
    args.apply_overrides(&mut settings);

    let client = GithubProfileClient::new(&settings.api_base_url, &settings.user_agent)
        .with_context(|| format!("failed to set up client for '{}'", settings.api_base_url))?;

    if args.once {
        return run_once(&client, &settings.initial_username, args.json).await;
    }
    run_interactive(Arc::new(client), &settings).await
}

async fn run_once(client: &GithubProfileClient, username: &str, json: bool) -> Result<()> {
    let profile = client.fetch_profile(username).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", render::render_profile(&profile));
    }
    Ok(())
}

async fn run_interactive(fetcher: Arc<dyn ProfileFetcher>, settings: &Settings) -> Result<()> {
    info!(
        username = %settings.initial_username,
        debounce_ms = settings.debounce_ms,
        policy = ?settings.stale_policy,
        "mounting profile lookup"
    );
    println!("Type a GitHub username and press enter ({QUIT_COMMAND} or EOF to quit).");

    let controller = ProfileLookupController::mount(settings.lookup_config(), fetcher);
    let mut states = controller.subscribe();
    println!("{}", render::render_state(&states.borrow_and_update()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                println!("{}", render::render_state(&state));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                let input = line.trim();
                if input == QUIT_COMMAND {
                    break;
                }
                controller.set_input(input);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_loaded_settings() {
        let args = Args::try_parse_from([
            "profile-lookup",
            "--username",
            "octocat",
            "--debounce-ms",
            "50",
            "--stale-policy",
            "last-arrival-wins",
        ])
        .expect("parse");
        let mut settings = Settings::default();
        args.apply_overrides(&mut settings);

        assert_eq!(settings.initial_username, "octocat");
        assert_eq!(settings.debounce_ms, 50);
        assert_eq!(settings.stale_policy, StalePolicy::LastArrivalWins);
        assert_eq!(settings.api_base_url, Settings::default().api_base_url);
    }

    #[test]
    fn json_requires_once() {
        assert!(Args::try_parse_from(["profile-lookup", "--json"]).is_err());
        let args = Args::try_parse_from(["profile-lookup", "--once", "--json"]).expect("parse");
        assert!(args.once && args.json);
        assert_eq!(args.config, PathBuf::from(DEFAULT_SETTINGS_FILE));
    }
}
