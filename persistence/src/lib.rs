//! FILENAME: persistence/src/lib.rs
//! Configuration Persistence Module
//!
//! Durable storage for named pivot configurations: a JSON array of
//! `PivotConfig` objects in a single file under a well-known key.
//! Reads degrade gracefully - a missing or corrupt store is logged and
//! treated as an empty list, never a fatal error. Writes are
//! last-writer-wins; there is a single local writer.

mod error;

pub use error::PersistenceError;

use std::fs;
use std::path::{Path, PathBuf};

use crosstab_engine::store::{new_config_id, validate_config, ConfigStore, StoreError, StoreResult};
use crosstab_engine::PivotConfig;

// ============================================================================
// STORE KEY (the durable store holds one entry under this name)
// ============================================================================

/// Well-known key of the configuration list in the durable store.
/// Absence of the file is equivalent to an empty array.
pub const CONFIG_STORE_KEY: &str = "pivot-configs";

// ============================================================================
// JSON CONFIG STORE
// ============================================================================

/// File-backed `ConfigStore`. Mutations validate first, write the
/// updated array to disk, and only commit it in memory once the write
/// succeeds, so reads always reflect durable state. The config list is
/// small and a full rewrite keeps the file consistent without locking.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    configs: Vec<PivotConfig>,
}

impl JsonConfigStore {
    /// Opens (or creates) the store inside `dir`. A corrupt or missing
    /// store file loads as an empty list.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(format!("{}.json", CONFIG_STORE_KEY));
        let configs = read_configs(&path);
        Ok(JsonConfigStore { path, configs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, configs: &[PivotConfig]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(configs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Reads the stored configuration array, degrading to empty on any
/// failure so one bad file cannot block the rest of the application.
fn read_configs(path: &Path) -> Vec<PivotConfig> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("config store unreadable ({}), starting empty: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(configs) => configs,
        Err(e) => {
            log::warn!("config store corrupt ({}), starting empty: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn backend(e: PersistenceError) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl ConfigStore for JsonConfigStore {
    fn save(&mut self, mut config: PivotConfig) -> StoreResult<PivotConfig> {
        validate_config(&config)?;

        let mut configs = self.configs.clone();
        if config.id.is_empty() {
            config.id = new_config_id();
            configs.push(config.clone());
        } else if let Some(slot) = configs.iter_mut().find(|c| c.id == config.id) {
            *slot = config.clone();
        } else {
            configs.push(config.clone());
        }

        self.persist(&configs).map_err(backend)?;
        self.configs = configs;
        Ok(config)
    }

    fn update(&mut self, id: &str, mut config: PivotConfig) -> StoreResult<PivotConfig> {
        validate_config(&config)?;

        let mut configs = self.configs.clone();
        let slot = configs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        config.id = id.to_string();
        *slot = config.clone();

        self.persist(&configs).map_err(backend)?;
        self.configs = configs;
        Ok(config)
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        if !self.configs.iter().any(|c| c.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let mut configs = self.configs.clone();
        configs.retain(|c| c.id != id);

        self.persist(&configs).map_err(backend)?;
        self.configs = configs;
        Ok(())
    }

    fn get(&self, id: &str) -> Option<PivotConfig> {
        self.configs.iter().find(|c| c.id == id).cloned()
    }

    fn list_all(&self) -> Vec<PivotConfig> {
        self.configs.clone()
    }
}
