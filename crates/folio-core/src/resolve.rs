//! Template resolution: base template + customization = effective template.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::merge_facet;
use crate::registry::{TemplateRegistry, DEFAULT_TEMPLATE_ID};
use crate::section::{group_by_area, SectionGroups};
use crate::template::{
    Animations, Colors, Customization, DarkMode, Layout, Section, Template, TemplateCategory,
    Typography,
};

/// The persisted pair an effective template is rebuilt from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    #[serde(default = "default_template_id")]
    pub template_id: String,
    #[serde(default)]
    pub customization: Customization,
}

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template_id: default_template_id(),
            customization: Customization::default(),
        }
    }
}

impl TemplateConfig {
    pub fn new(template_id: &str) -> Self {
        Self {
            template_id: template_id.to_string(),
            customization: Customization::default(),
        }
    }

    /// Parse an imported configuration.
    ///
    /// Requires an object with a non-blank string `templateId`; the
    /// customization may be missing. Returns `None` for anything else.
    pub fn from_import(json: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(json).ok()?;
        let id = value.get("templateId")?.as_str()?.trim();
        if id.is_empty() {
            return None;
        }
        if value.get("customization").is_some_and(|c| !c.is_object()) {
            return None;
        }
        let mut config: TemplateConfig = serde_json::from_value(value).ok()?;
        config.template_id = config.template_id.trim().to_string();
        Some(config)
    }
}

/// A fully merged, render-ready configuration. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveTemplate {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub colors: Colors,
    pub typography: Typography,
    pub layout: Layout,
    pub sections: Vec<Section>,
    pub animations: Animations,
    pub dark_mode: DarkMode,
    pub custom_css: Option<String>,
    /// Enabled sections grouped by layout area.
    pub structure: SectionGroups,
}

impl EffectiveTemplate {
    /// Rebuild from a persisted config against the current registry.
    pub fn from_config(registry: &TemplateRegistry, config: &TemplateConfig) -> Self {
        let template = registry.resolve_id(Some(&config.template_id));
        resolve(template, &config.customization)
    }
}

/// Merge one facet, keeping the base when the patch is absent or unusable.
fn merge_or_keep<T, P>(facet: &str, base: &T, patch: Option<&P>) -> T
where
    T: Serialize + DeserializeOwned + Clone,
    P: Serialize,
{
    let Some(patch) = patch else {
        return base.clone();
    };
    merge_facet(base, patch).unwrap_or_else(|e| {
        tracing::warn!("Ignoring {} customization: {}", facet, e);
        base.clone()
    })
}

/// Resolve a template and a customization into an effective template.
pub fn resolve(template: &Template, customization: &Customization) -> EffectiveTemplate {
    let colors = merge_or_keep("colors", &template.colors, customization.colors.as_ref());
    let typography = merge_or_keep(
        "typography",
        &template.typography,
        customization.typography.as_ref(),
    );
    let layout = merge_or_keep("layout", &template.layout, customization.layout.as_ref());

    let mut sections = match &customization.sections {
        Some(sections) if !sections.is_empty() => sections.clone(),
        _ => template.sections.clone(),
    };
    sections.sort_by_key(|s| s.order);

    let animations = match customization.animations {
        Some(patch) => Animations {
            enabled: patch.enabled.unwrap_or(template.animations.enabled),
            kind: patch.kind.unwrap_or(template.animations.kind),
        },
        None => template.animations,
    };

    let dark_mode = match customization.dark_mode {
        Some(patch) => DarkMode {
            enabled: patch.enabled.unwrap_or(template.dark_mode.enabled),
            auto: patch.auto.unwrap_or(template.dark_mode.auto),
        },
        None => template.dark_mode,
    };

    let custom_css = customization
        .custom_css
        .as_ref()
        .filter(|css| !css.trim().is_empty())
        .cloned();

    let structure = group_by_area(&sections);
    if structure.duplicates_dropped > 0 {
        tracing::debug!(
            "Template '{}' resolved with {} duplicate sections dropped",
            template.id,
            structure.duplicates_dropped
        );
    }

    EffectiveTemplate {
        id: template.id.clone(),
        name: template.name.clone(),
        category: template.category,
        colors,
        typography,
        layout,
        sections,
        animations,
        dark_mode,
        custom_css,
        structure,
    }
}
