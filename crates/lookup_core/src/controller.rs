use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use shared::domain::Profile;
use tokio::{
    sync::watch,
    task::{self, AbortHandle, JoinError, JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{debounce::Debouncer, error::LookupError, fetcher::ProfileFetcher};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResponsePolicy {
    #[default]
    DiscardStale,
    CancelSuperseded,
    /// Responses apply in arrival order, so a slow stale one can win.
    LastArrivalWins,
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub initial_username: String,
    pub debounce: Duration,
    pub stale_policy: StaleResponsePolicy,
}

impl LookupConfig {
    pub fn new(initial_username: impl Into<String>) -> Self {
        Self {
            initial_username: initial_username.into(),
            debounce: DEFAULT_DEBOUNCE,
            stale_policy: StaleResponsePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupState {
    /// Settled username the latest lookup was issued for.
    pub username: String,
    pub loading: bool,
    pub profile: Option<Profile>,
    pub error: Option<String>,
    /// Token of the most recently issued lookup.
    pub generation: u64,
}

impl LookupState {
    fn mounting(username: String) -> Self {
        Self {
            username,
            loading: true,
            profile: None,
            error: None,
            generation: 0,
        }
    }
}

pub struct ProfileLookupController {
    debouncer: Debouncer<String>,
    state: watch::Receiver<LookupState>,
    mounted: Arc<Mutex<bool>>,
    driver: JoinHandle<()>,
}

impl ProfileLookupController {
    /// Issues the lookup for `config.initial_username` immediately.
    pub fn mount(config: LookupConfig, fetcher: Arc<dyn ProfileFetcher>) -> Self {
        let debouncer = Debouncer::new(config.initial_username.clone(), config.debounce);
        let (state_tx, state) = watch::channel(LookupState::mounting(
            config.initial_username.clone(),
        ));

        let mounted = Arc::new(Mutex::new(true));

        let mut driver = LookupDriver {
            fetcher,
            policy: config.stale_policy,
            state: state_tx,
            mounted: Arc::clone(&mounted),
            in_flight: JoinSet::new(),
            task_generations: HashMap::new(),
            latest: None,
            generation: 0,
        };
        driver.begin_lookup(config.initial_username);
        let driver = tokio::spawn(driver.run(debouncer.subscribe()));

        Self {
            debouncer,
            state,
            mounted,
            driver,
        }
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.debouncer.push(input.into());
    }

    pub fn input(&self) -> String {
        self.debouncer.current()
    }

    pub fn snapshot(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.clone()
    }
}

impl Drop for ProfileLookupController {
    fn drop(&mut self) {
        *self.mounted.lock().unwrap_or_else(PoisonError::into_inner) = false;
        // Dropping the driver drops its JoinSet, which aborts in-flight fetches.
        self.driver.abort();
    }
}

struct LookupOutcome {
    username: String,
    result: Result<Profile, LookupError>,
}

struct LookupDriver {
    fetcher: Arc<dyn ProfileFetcher>,
    policy: StaleResponsePolicy,
    state: watch::Sender<LookupState>,
    mounted: Arc<Mutex<bool>>,
    in_flight: JoinSet<LookupOutcome>,
    task_generations: HashMap<task::Id, u64>,
    latest: Option<AbortHandle>,
    generation: u64,
}

impl LookupDriver {
    async fn run(mut self, mut settled: watch::Receiver<String>) {
        loop {
            tokio::select! {
                changed = settled.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let username = settled.borrow_and_update().clone();
                    self.begin_lookup(username);
                }
                Some(joined) = self.in_flight.join_next_with_id(), if !self.in_flight.is_empty() => {
                    self.finish_lookup(joined);
                }
            }
        }
    }

    /// Writes are skipped once the controller has been dropped, even if this
    /// poll was already running when the driver was aborted.
    fn publish(&self, modify: impl FnOnce(&mut LookupState)) {
        let mounted = self.mounted.lock().unwrap_or_else(PoisonError::into_inner);
        if *mounted {
            self.state.send_modify(modify);
        }
    }

    fn begin_lookup(&mut self, username: String) {
        self.generation += 1;
        let generation = self.generation;

        if self.policy == StaleResponsePolicy::CancelSuperseded {
            if let Some(previous) = self.latest.take() {
                previous.abort();
            }
        }

        // Placeholders are shown before the request resolves.
        self.publish(|state| {
            state.username = username.clone();
            state.loading = true;
            state.generation = generation;
        });

        info!(%username, generation, "issuing profile lookup");
        let fetcher = Arc::clone(&self.fetcher);
        let handle = self.in_flight.spawn(async move {
            let result = fetcher.fetch_profile(&username).await;
            LookupOutcome { username, result }
        });
        self.task_generations.insert(handle.id(), generation);
        self.latest = Some(handle);
    }

    fn finish_lookup(&mut self, joined: Result<(task::Id, LookupOutcome), JoinError>) {
        let (generation, outcome) = match joined {
            Ok((id, outcome)) => (self.task_generations.remove(&id), outcome),
            Err(err) => {
                let generation = self.task_generations.remove(&err.id());
                if err.is_cancelled() {
                    debug!(?generation, "superseded profile lookup cancelled");
                    return;
                }
                warn!(%err, ?generation, "profile lookup task failed");
                if generation == Some(self.generation) {
                    self.publish(|state| {
                        state.loading = false;
                        state.profile = None;
                        state.error = Some("Profile lookup stopped unexpectedly.".to_string());
                    });
                }
                return;
            }
        };

        if generation != Some(self.generation)
            && self.policy != StaleResponsePolicy::LastArrivalWins
        {
            debug!(
                username = %outcome.username,
                ?generation,
                latest = self.generation,
                "discarding stale profile response"
            );
            return;
        }

        self.publish(|state| {
            state.loading = false;
            match outcome.result {
                Ok(profile) => {
                    state.profile = Some(profile);
                    state.error = None;
                }
                Err(err) => {
                    warn!(username = %outcome.username, category = ?err.category(), %err, "profile lookup failed");
                    state.profile = None;
                    state.error = Some(err.to_string());
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
