//! Builds the store, event bus and controller bundle used by front-ends.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{
    CultivationListener, EventBus, PlayerController, PlayerRepository, PlayerService, Store,
    StorePlayerRepository, TimeTicker, Topic,
};

use crate::config::AppConfig;

/// Where the builder puts the store.
#[derive(Clone, Debug)]
enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Builder that assembles the store, event bus and controller for clients.
pub struct AppBuilder {
    config: AppConfig,
    location: StoreLocation,
    seed: Option<u64>,
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        let location = StoreLocation::File(config.resolved_db_path());
        Self {
            config,
            location,
            seed: None,
        }
    }

    /// Override the store file.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = StoreLocation::File(path.into());
        self
    }

    /// Keep the store in memory only.
    pub fn in_memory(mut self) -> Self {
        self.location = StoreLocation::Memory;
        self
    }

    /// Seed the breakthrough rolls of the cultivation listener.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<AppSetup> {
        let store = match &self.location {
            StoreLocation::File(path) => Store::open(path)
                .with_context(|| format!("failed to open store at {}", path.display()))?,
            StoreLocation::Memory => Store::in_memory(),
        };
        let store = Arc::new(store);

        let repository: Arc<dyn PlayerRepository> = Arc::new(
            StorePlayerRepository::new(Arc::clone(&store))
                .context("failed to prepare the players table")?,
        );
        let events = EventBus::new();

        let cultivation = Arc::new(match self.seed {
            Some(seed) => {
                CultivationListener::seeded(Arc::clone(&repository), events.clone(), seed)
            }
            None => CultivationListener::new(Arc::clone(&repository), events.clone()),
        });
        events.subscribe(Topic::TimePass, cultivation.clone());

        let service = PlayerService::new(repository, events.clone());
        let controller = PlayerController::new(service, &self.config.runtime);

        tracing::info!(
            store = ?store.path().map(|p| p.display().to_string()),
            "sect runtime ready"
        );

        Ok(AppSetup {
            config: self.config,
            store,
            events,
            controller,
            cultivation,
        })
    }
}

pub struct AppSetup {
    pub config: AppConfig,
    pub store: Arc<Store>,
    pub events: EventBus,
    pub controller: PlayerController,
    pub cultivation: Arc<CultivationListener>,
}

impl AppSetup {
    /// Starts publishing time passes with the configured interval.
    ///
    /// `years_per_tick` overrides the configured step when given.
    pub fn spawn_ticker(&self, years_per_tick: Option<u32>) -> TimeTicker {
        TimeTicker::spawn(
            self.events.clone(),
            self.config.runtime.tick_interval,
            years_per_tick.unwrap_or(self.config.runtime.years_per_tick),
        )
    }

    /// Drops every listener and closes the store.
    pub fn shutdown(self) -> Result<()> {
        self.events.clear(None);
        self.store.close().context("failed to close store")?;
        Ok(())
    }
}
