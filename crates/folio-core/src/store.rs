//! Persistence of template configuration and portfolio content.
//!
//! Storage is a plain string key-value store holding JSON documents, the
//! same shape browser local storage offers. Reads never fail outward: a
//! missing or corrupt document yields the default value and a warning.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::portfolio::PortfolioData;
use crate::registry::TemplateRegistry;
use crate::resolve::TemplateConfig;
use crate::template::Template;

/// Key holding the `(templateId, customization)` pair.
pub const TEMPLATE_CONFIG_KEY: &str = "folio.template-config";
/// Key holding the portfolio content.
pub const PORTFOLIO_DATA_KEY: &str = "folio.portfolio-data";
/// Key holding user custom templates.
pub const CUSTOM_TEMPLATES_KEY: &str = "folio.custom-templates";

/// Errors that can occur writing to a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Failed to serialize {key}: {message}")]
    Serialize { key: String, message: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(e.to_string()))?;

        // Write then rename so readers never observe a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StoreError::Io(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Typed access to the documents folio keeps in a [`KeyValueStore`].
#[derive(Clone)]
pub struct PortfolioStore {
    inner: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore").finish_non_exhaustive()
    }
}

impl PortfolioStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read a document, substituting the default for missing or bad data.
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.inner.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable {}: {}", key, e);
            T::default()
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.inner.set(key, &json)
    }

    pub fn load_template_config(&self) -> TemplateConfig {
        self.load_or_default(TEMPLATE_CONFIG_KEY)
    }

    pub fn save_template_config(&self, config: &TemplateConfig) -> Result<(), StoreError> {
        self.save(TEMPLATE_CONFIG_KEY, config)
    }

    pub fn load_portfolio(&self) -> PortfolioData {
        self.load_or_default(PORTFOLIO_DATA_KEY)
    }

    pub fn save_portfolio(&self, data: &PortfolioData) -> Result<(), StoreError> {
        self.save(PORTFOLIO_DATA_KEY, data)
    }

    /// Load persisted custom templates into `registry`.
    pub fn load_custom_templates(&self, registry: &mut TemplateRegistry) -> usize {
        let templates: Vec<Template> = self.load_or_default(CUSTOM_TEMPLATES_KEY);
        registry.set_custom(templates);
        registry.custom().len()
    }

    pub fn save_custom_templates(&self, registry: &TemplateRegistry) -> Result<(), StoreError> {
        self.save(CUSTOM_TEMPLATES_KEY, &registry.custom())
    }

    /// Remove every folio document.
    pub fn clear(&self) -> Result<(), StoreError> {
        for key in [TEMPLATE_CONFIG_KEY, PORTFOLIO_DATA_KEY, CUSTOM_TEMPLATES_KEY] {
            self.inner.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Project;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn memory_store_round_trips_documents() {
        let store = PortfolioStore::in_memory();
        let mut data = PortfolioData::default();
        data.personal.name = "Ada".into();
        data.projects.push(Project {
            title: "Engine".into(),
            ..Default::default()
        });

        store.save_portfolio(&data).unwrap();

        assert_eq!(store.load_portfolio(), data);
    }

    #[test]
    fn missing_documents_yield_defaults() {
        let store = PortfolioStore::in_memory();
        assert_eq!(store.load_template_config(), TemplateConfig::default());
        assert_eq!(store.load_portfolio(), PortfolioData::default());
    }

    #[test]
    fn corrupt_documents_yield_defaults() {
        let raw = MemoryStore::new();
        raw.set(TEMPLATE_CONFIG_KEY, "{not json").unwrap();
        raw.set(PORTFOLIO_DATA_KEY, r#"{"projects": 12}"#).unwrap();
        let store = PortfolioStore::new(raw);

        assert_eq!(store.load_template_config(), TemplateConfig::default());
        assert_eq!(store.load_portfolio(), PortfolioData::default());
    }

    #[test]
    fn file_store_persists_between_instances() {
        let temp = tempdir().unwrap();
        let config = TemplateConfig::new("minimal");

        PortfolioStore::new(FileStore::new(temp.path()))
            .save_template_config(&config)
            .unwrap();
        let loaded = PortfolioStore::new(FileStore::new(temp.path())).load_template_config();

        assert_eq!(loaded, config);
        assert!(temp.path().join("folio.template-config.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let store = FileStore::new("state");
        assert!(matches!(store.path_for("../etc/passwd"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StoreError::InvalidKey(_))));
        assert!(store.path_for("folio.portfolio-data").is_ok());
    }

    #[test]
    fn clear_removes_documents() {
        let temp = tempdir().unwrap();
        let store = PortfolioStore::new(FileStore::new(temp.path()));
        store.save_portfolio(&PortfolioData::default()).unwrap();

        store.clear().unwrap();

        assert!(!temp.path().join("folio.portfolio-data.json").exists());
    }

    #[test]
    fn custom_templates_round_trip() {
        let store = PortfolioStore::in_memory();
        let mut registry = TemplateRegistry::new();
        registry.duplicate("minimal", "Mono").unwrap();
        store.save_custom_templates(&registry).unwrap();

        let mut fresh = TemplateRegistry::new();
        let count = store.load_custom_templates(&mut fresh);

        assert_eq!(count, 1);
        assert!(fresh.contains("custom-mono"));
    }
}
