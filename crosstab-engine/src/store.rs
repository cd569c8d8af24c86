//! FILENAME: crosstab-engine/src/store.rs
//! Configuration Store - The seam between the engine and durability.
//!
//! The engine never touches storage directly: it talks to a
//! `ConfigStore` collaborator with explicit load/save lifecycle calls.
//! The `persistence` crate provides the durable JSON-backed
//! implementation; `MemoryConfigStore` here serves tests and embedders
//! that do not need durability.

use thiserror::Error;
use uuid::Uuid;

use crate::definition::{ConfigId, PivotConfig};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by configuration CRUD. `Validation` is the
/// non-fatal, user-facing kind: the operation is aborted and no state
/// is mutated.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("no saved configuration with id {0}")]
    NotFound(ConfigId),

    #[error("storage error: {0}")]
    Backend(String),
}

/// Checks a configuration before it may be saved or updated: the name
/// must be non-blank and the field selection complete.
pub fn validate_config(config: &PivotConfig) -> StoreResult<()> {
    if config.name.trim().is_empty() {
        return Err(StoreError::Validation(
            "please enter a name for this pivot configuration".to_string(),
        ));
    }
    if config.row_fields.is_empty() || config.col_fields.is_empty() {
        return Err(StoreError::Validation(
            "select at least one row field and one column field before saving".to_string(),
        ));
    }
    if config.value_field.is_empty() {
        return Err(StoreError::Validation(
            "select a value field before saving".to_string(),
        ));
    }
    Ok(())
}

/// Generates a fresh configuration id.
pub fn new_config_id() -> ConfigId {
    Uuid::new_v4().to_string()
}

/// CRUD over named pivot configurations. Single local writer,
/// last-writer-wins; reads reflect the most recent write.
pub trait ConfigStore {
    /// Saves a configuration. An empty id means "create": the store
    /// assigns one. A known id overwrites in place. Returns the stored
    /// configuration (with its id).
    fn save(&mut self, config: PivotConfig) -> StoreResult<PivotConfig>;

    /// Overwrites the configuration with the given id.
    fn update(&mut self, id: &str, config: PivotConfig) -> StoreResult<PivotConfig>;

    /// Removes a configuration.
    fn delete(&mut self, id: &str) -> StoreResult<()>;

    /// Fetches one configuration by id.
    fn get(&self, id: &str) -> Option<PivotConfig>;

    /// All saved configurations, in storage order.
    fn list_all(&self) -> Vec<PivotConfig>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Non-durable `ConfigStore` for tests and ephemeral embedding.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    configs: Vec<PivotConfig>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        MemoryConfigStore::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn save(&mut self, mut config: PivotConfig) -> StoreResult<PivotConfig> {
        validate_config(&config)?;

        if config.id.is_empty() {
            config.id = new_config_id();
            self.configs.push(config.clone());
            return Ok(config);
        }

        match self.configs.iter_mut().find(|c| c.id == config.id) {
            Some(slot) => *slot = config.clone(),
            None => self.configs.push(config.clone()),
        }
        Ok(config)
    }

    fn update(&mut self, id: &str, mut config: PivotConfig) -> StoreResult<PivotConfig> {
        validate_config(&config)?;

        let slot = self
            .configs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        config.id = id.to_string();
        *slot = config.clone();
        Ok(config)
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        let before = self.configs.len();
        self.configs.retain(|c| c.id != id);
        if self.configs.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Option<PivotConfig> {
        self.configs.iter().find(|c| c.id == id).cloned()
    }

    fn list_all(&self) -> Vec<PivotConfig> {
        self.configs.clone()
    }
}
