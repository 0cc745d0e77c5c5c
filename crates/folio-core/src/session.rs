//! Editor session: the current configuration and content being edited.
//!
//! Every configuration change bumps a revision. Customization writes carry
//! the revision they were based on and are rejected once a template switch
//! (or any other configuration change) has moved the session past it.

use std::path::Path;

use crate::portfolio::PortfolioData;
use crate::registry::TemplateRegistry;
use crate::resolve::{EffectiveTemplate, TemplateConfig};
use crate::store::PortfolioStore;
use crate::template::{Customization, Template};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Customization is based on revision {based_on}, session is at {current}")]
    Stale { based_on: u64, current: u64 },

    #[error("Template not found: {0}")]
    UnknownTemplate(String),
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    registry: TemplateRegistry,
    config: TemplateConfig,
    data: PortfolioData,
    effective: EffectiveTemplate,
    revision: u64,
}

impl EditorSession {
    pub fn new(registry: TemplateRegistry, config: TemplateConfig, data: PortfolioData) -> Self {
        let mut config = config;
        if !registry.contains(&config.template_id) {
            tracing::warn!(
                "Saved template '{}' is not available, resetting to '{}'",
                config.template_id,
                registry.default_template().id
            );
            config = TemplateConfig::new(&registry.default_template().id);
        }
        let effective = EffectiveTemplate::from_config(&registry, &config);
        Self {
            registry,
            config,
            data,
            effective,
            revision: 0,
        }
    }

    /// Restore the last saved session, adding any template files found in
    /// `templates_dir` to the persisted custom templates.
    pub fn restore(store: &PortfolioStore, templates_dir: Option<&Path>) -> Self {
        let mut registry = TemplateRegistry::new();
        let saved = store.load_custom_templates(&mut registry);
        let loaded = templates_dir.map_or(0, |dir| registry.load_dir(dir));
        tracing::debug!("Restored {} saved and {} file templates", saved, loaded);

        Self::new(registry, store.load_template_config(), store.load_portfolio())
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn data(&self) -> &PortfolioData {
        &self.data
    }

    pub fn effective(&self) -> &EffectiveTemplate {
        &self.effective
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn recompute(&mut self) {
        self.effective = EffectiveTemplate::from_config(&self.registry, &self.config);
        self.revision += 1;
    }

    /// Switch template. The customization is reset to empty.
    pub fn select_template(&mut self, id: &str) -> Result<u64, SessionError> {
        if !self.registry.contains(id) {
            return Err(SessionError::UnknownTemplate(id.to_string()));
        }
        self.config = TemplateConfig::new(id.trim());
        self.recompute();
        tracing::info!("Selected template '{}'", self.config.template_id);
        Ok(self.revision)
    }

    /// Replace the customization, provided nothing changed since `based_on`.
    pub fn update_customization(
        &mut self,
        based_on: u64,
        customization: Customization,
    ) -> Result<u64, SessionError> {
        if based_on != self.revision {
            return Err(SessionError::Stale {
                based_on,
                current: self.revision,
            });
        }
        self.config.customization = customization;
        self.recompute();
        Ok(self.revision)
    }

    /// Replace the portfolio content. Content edits do not affect the revision.
    pub fn replace_portfolio(&mut self, data: PortfolioData) {
        self.data = data;
    }

    /// Replace the whole configuration, e.g. after an external edit.
    pub fn replace_config(&mut self, config: TemplateConfig) {
        self.config = config;
        self.recompute();
    }

    /// Apply an imported configuration. Returns `false` and changes nothing
    /// when the JSON is invalid.
    pub fn import_config(&mut self, json: &str) -> bool {
        match TemplateConfig::from_import(json) {
            Some(config) => {
                self.replace_config(config);
                true
            }
            None => {
                tracing::warn!("Rejected imported configuration");
                false
            }
        }
    }

    /// The current configuration as pretty JSON.
    pub fn export_config(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap_or_else(|_| "{}".to_string())
    }

    /// Save the current effective look as a new custom template and select it.
    pub fn save_as_custom(&mut self, name: &str) -> String {
        let mut template = self.registry.resolve_id(Some(&self.config.template_id)).clone();
        template.colors = self.effective.colors.clone();
        template.typography = self.effective.typography.clone();
        template.layout = self.effective.layout.clone();
        template.sections = self.effective.sections.clone();
        template.animations = self.effective.animations;
        template.dark_mode = self.effective.dark_mode;

        let id = self.registry.add_custom(template, name).id.clone();
        self.config = TemplateConfig::new(&id);
        self.recompute();
        id
    }

    /// Copy a template into a new custom template. The selection is unchanged.
    pub fn duplicate_template(&mut self, id: &str, name: &str) -> Result<String, SessionError> {
        self.registry
            .duplicate(id, name)
            .map(|t| t.id.clone())
            .ok_or_else(|| SessionError::UnknownTemplate(id.to_string()))
    }

    /// Import a custom template into the session registry.
    pub fn import_template(&mut self, json: &str) -> bool {
        self.registry.import_custom(json)
    }

    /// Remove a custom template. Removing the selected one falls back to the
    /// default template.
    pub fn remove_template(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.registry.remove_custom(id) {
            return Err(SessionError::UnknownTemplate(id.to_string()));
        }
        if self.config.template_id == id {
            self.config = TemplateConfig::new(&self.registry.default_template().id);
            self.recompute();
        }
        Ok(())
    }

    /// Replace the custom templates, e.g. after an external edit.
    pub fn replace_custom_templates(&mut self, templates: Vec<Template>) {
        self.registry.set_custom(templates);
        if !self.registry.contains(&self.config.template_id) {
            tracing::warn!(
                "Template '{}' was removed, resetting to '{}'",
                self.config.template_id,
                self.registry.default_template().id
            );
            self.config = TemplateConfig::new(&self.registry.default_template().id);
        }
        self.recompute();
    }
}
