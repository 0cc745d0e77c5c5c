//! Project configuration (`folio.toml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_core::{FileStore, PortfolioStore};
use folio_server::PreviewConfig;
use folio_static::ExportOptions;

/// Configuration file structure (folio.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Site title; the portfolio owner's name when unset
    pub title: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Where the session documents are kept
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Extra template JSON files
    pub templates_dir: Option<PathBuf>,
    /// Images and videos served by the preview server
    pub assets_dir: Option<PathBuf>,
    /// Portfolio data file (JSON or YAML) used instead of the saved data
    pub data: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: None,
            lang: default_lang(),
            state_dir: default_state_dir(),
            templates_dir: None,
            assets_dir: None,
            data: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_minify")]
    pub minify: bool,
    #[serde(default)]
    pub single_page: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: default_minify(),
            single_page: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            open: default_open(),
            autosave_ms: default_autosave_ms(),
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}
fn default_state_dir() -> PathBuf {
    PathBuf::from(".folio")
}
fn default_output() -> PathBuf {
    PathBuf::from("dist")
}
fn default_minify() -> bool {
    true
}
fn default_port() -> u16 {
    7777
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_open() -> bool {
    true
}
fn default_autosave_ms() -> u64 {
    1000
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn store(&self) -> PortfolioStore {
        PortfolioStore::new(FileStore::new(&self.site.state_dir))
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            minify: self.build.minify,
            lang: self.site.lang.clone(),
            title: self.site.title.clone(),
            single_page: self.build.single_page,
        }
    }

    pub fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            state_dir: self.site.state_dir.clone(),
            templates_dir: self.site.templates_dir.clone(),
            assets_dir: self.site.assets_dir.clone(),
            port: self.server.port,
            host: self.server.host.clone(),
            open: self.server.open,
            export: self.export_options(),
            autosave: Duration::from_millis(self.server.autosave_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = ConfigFile::load(&temp.path().join("folio.toml")).unwrap();

        assert_eq!(config.site.state_dir, PathBuf::from(".folio"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(config.build.minify);
        assert_eq!(config.server.port, 7777);
        assert_eq!(config.preview_config().autosave, Duration::from_millis(1000));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, "[site]\ntitle = \"Ada\"\n\n[server]\nport = 9000\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config.site.title.as_deref(), Some("Ada"));
        assert_eq!(config.site.lang, "en");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.export_options().title.as_deref(), Some("Ada"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }
}
