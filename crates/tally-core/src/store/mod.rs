//! Store management for tally
//!
//! The store is the `.tally/` directory holding `config.toml` and the SQLite
//! ledger. Scoring, results and report operations hang off [`Store`].

pub mod paths;
mod scoring;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::{Result, TallyError};
use crate::model::{Event, EventId};
use paths::{CONFIG_FILE, DEFAULT_STORE_DIR};

/// The tally store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store configuration
    config: StoreConfig,
    /// SQLite database
    db: Database,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = paths::discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(TallyError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        let db = Database::open(path, &config.scoring)?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db,
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path) -> Result<Self> {
        Self::init_at(&project_root.join(DEFAULT_STORE_DIR))
    }

    /// Initialize a store at an explicit store root path.
    ///
    /// Idempotent: an existing config is kept as is.
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        let config_path = store_root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            let config = StoreConfig::default();
            config.save(&config_path)?;
            config
        };

        let db = Database::open(store_root, &config.scoring)?;
        let store = Store {
            root: store_root.to_path_buf(),
            config,
            db,
        };
        // Scoring always has somewhere to land
        store.active_event()?;
        Ok(store)
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the database
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The event scoring binds to, created on first use
    pub fn active_event(&self) -> Result<Event> {
        self.db.active_event(&self.config.scoring.default_event_name)
    }

    /// An explicit event for history browsing, or the active one
    pub fn resolve_event(&self, event: Option<EventId>) -> Result<Event> {
        match event {
            Some(id) => self.db.get_event(id),
            None => self.active_event(),
        }
    }

    /// Archive the active event and open a fresh one; returns `(closed, started)`
    #[tracing::instrument(skip(self))]
    pub fn close_active_event(&self) -> Result<(Event, Event)> {
        self.db
            .close_active_event(&self.config.scoring.default_event_name)
    }
}

#[cfg(test)]
mod tests;
