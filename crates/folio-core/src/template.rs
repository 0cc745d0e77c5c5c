//! Template and customization data model.
//!
//! A [`Template`] is a complete, read-only visual configuration. A
//! [`Customization`] is a typed partial overlay of the same facets; only the
//! leaves it sets override the template when the two are resolved.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::merge::Patch;
use crate::section::{deserialize_area, deserialize_enabled, deserialize_order, LayoutArea};

/// Hardcoded values used whenever a template leaf is missing or blank.
pub mod fallback {
    pub const PRIMARY: &str = "#2563eb";
    pub const SECONDARY: &str = "#7c3aed";
    pub const ACCENT: &str = "#06b6d4";
    pub const BACKGROUND: &str = "#ffffff";
    pub const SURFACE: &str = "#f8fafc";
    pub const TEXT_PRIMARY: &str = "#0f172a";
    pub const TEXT_SECONDARY: &str = "#475569";
    pub const TEXT_ACCENT: &str = "#2563eb";
    pub const GRADIENT_DIRECTION: &str = "135deg";

    pub const DARK_BACKGROUND: &str = "#0f172a";
    pub const DARK_SURFACE: &str = "#1e293b";
    pub const DARK_TEXT_PRIMARY: &str = "#f1f5f9";
    pub const DARK_TEXT_SECONDARY: &str = "#cbd5e1";

    pub const FONT_PRIMARY: &str = "'Inter', system-ui, -apple-system, sans-serif";
    pub const FONT_HEADING: &str = "'Inter', system-ui, -apple-system, sans-serif";
    pub const FONT_CODE: &str = "'JetBrains Mono', ui-monospace, monospace";

    pub const FS_XS: &str = "0.75rem";
    pub const FS_SM: &str = "0.875rem";
    pub const FS_BASE: &str = "1rem";
    pub const FS_LG: &str = "1.125rem";
    pub const FS_XL: &str = "1.25rem";
    pub const FS_2XL: &str = "1.5rem";
    pub const FS_3XL: &str = "1.875rem";
    pub const FS_4XL: &str = "2.25rem";

    pub const FW_LIGHT: u16 = 300;
    pub const FW_NORMAL: u16 = 400;
    pub const FW_MEDIUM: u16 = 500;
    pub const FW_SEMIBOLD: u16 = 600;
    pub const FW_BOLD: u16 = 700;

    pub const MAX_WIDTH: &str = "1200px";
    pub const SP_XS: &str = "0.25rem";
    pub const SP_SM: &str = "0.5rem";
    pub const SP_MD: &str = "1rem";
    pub const SP_LG: &str = "2rem";
    pub const SP_XL: &str = "4rem";
    pub const RADIUS_SM: &str = "0.25rem";
    pub const RADIUS_MD: &str = "0.5rem";
    pub const RADIUS_LG: &str = "1rem";
    pub const RADIUS_FULL: &str = "9999px";
    pub const SHADOW_SM: &str = "0 1px 2px rgba(0, 0, 0, 0.05)";
    pub const SHADOW_MD: &str = "0 4px 6px rgba(0, 0, 0, 0.1)";
    pub const SHADOW_LG: &str = "0 10px 15px rgba(0, 0, 0, 0.1)";
    pub const SHADOW_XL: &str = "0 20px 25px rgba(0, 0, 0, 0.15)";
}

/// Broad visual family a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    #[default]
    Modern,
    Minimal,
    Creative,
    Professional,
    Developer,
    #[serde(other)]
    Other,
}

/// A complete visual configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: TemplateCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub animations: Animations,
    #[serde(default)]
    pub dark_mode: DarkMode,
    /// Set on templates a user duplicated or imported.
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: TextColors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary: fallback::PRIMARY.to_string(),
            secondary: fallback::SECONDARY.to_string(),
            accent: fallback::ACCENT.to_string(),
            background: fallback::BACKGROUND.to_string(),
            surface: fallback::SURFACE.to_string(),
            text: TextColors::default(),
            gradient: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            primary: fallback::TEXT_PRIMARY.to_string(),
            secondary: fallback::TEXT_SECONDARY.to_string(),
            accent: fallback::TEXT_ACCENT.to_string(),
        }
    }
}

/// Header gradient. Only used when both ends are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gradient {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

impl Gradient {
    pub fn new(from: &str, to: &str, direction: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            direction: Some(direction.to_string()),
        }
    }

    /// CSS value for this gradient, or `None` when an end is blank.
    pub fn css(&self) -> Option<String> {
        if self.from.trim().is_empty() || self.to.trim().is_empty() {
            return None;
        }
        let direction = self
            .direction
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback::GRADIENT_DIRECTION);
        Some(format!(
            "linear-gradient({}, {}, {})",
            direction,
            self.from.trim(),
            self.to.trim()
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub font_family: FontFamily,
    pub font_size: FontSizes,
    pub font_weight: FontWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFamily {
    pub primary: String,
    pub heading: String,
    pub code: String,
}

impl Default for FontFamily {
    fn default() -> Self {
        Self {
            primary: fallback::FONT_PRIMARY.to_string(),
            heading: fallback::FONT_HEADING.to_string(),
            code: fallback::FONT_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub xs: String,
    pub sm: String,
    pub base: String,
    pub lg: String,
    pub xl: String,
    #[serde(rename = "2xl")]
    pub xl2: String,
    #[serde(rename = "3xl")]
    pub xl3: String,
    #[serde(rename = "4xl")]
    pub xl4: String,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            xs: fallback::FS_XS.to_string(),
            sm: fallback::FS_SM.to_string(),
            base: fallback::FS_BASE.to_string(),
            lg: fallback::FS_LG.to_string(),
            xl: fallback::FS_XL.to_string(),
            xl2: fallback::FS_2XL.to_string(),
            xl3: fallback::FS_3XL.to_string(),
            xl4: fallback::FS_4XL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontWeights {
    pub light: u16,
    pub normal: u16,
    pub medium: u16,
    pub semibold: u16,
    pub bold: u16,
}

impl Default for FontWeights {
    fn default() -> Self {
        Self {
            light: fallback::FW_LIGHT,
            normal: fallback::FW_NORMAL,
            medium: fallback::FW_MEDIUM,
            semibold: fallback::FW_SEMIBOLD,
            bold: fallback::FW_BOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub max_width: String,
    pub spacing: Spacing,
    pub border_radius: Radii,
    pub shadow: Shadows,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            max_width: fallback::MAX_WIDTH.to_string(),
            spacing: Spacing::default(),
            border_radius: Radii::default(),
            shadow: Shadows::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            xs: fallback::SP_XS.to_string(),
            sm: fallback::SP_SM.to_string(),
            md: fallback::SP_MD.to_string(),
            lg: fallback::SP_LG.to_string(),
            xl: fallback::SP_XL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Radii {
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub full: String,
}

impl Default for Radii {
    fn default() -> Self {
        Self {
            sm: fallback::RADIUS_SM.to_string(),
            md: fallback::RADIUS_MD.to_string(),
            lg: fallback::RADIUS_LG.to_string(),
            full: fallback::RADIUS_FULL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadows {
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

impl Default for Shadows {
    fn default() -> Self {
        Self {
            sm: fallback::SHADOW_SM.to_string(),
            md: fallback::SHADOW_MD.to_string(),
            lg: fallback::SHADOW_LG.to_string(),
            xl: fallback::SHADOW_XL.to_string(),
        }
    }
}

/// Entrance animation applied to sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    #[default]
    Fade,
    Slide,
    Zoom,
    #[serde(other)]
    None,
}

impl AnimationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Fade => "fade",
            AnimationKind::Slide => "slide",
            AnimationKind::Zoom => "zoom",
            AnimationKind::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Animations {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkMode {
    pub enabled: bool,
    /// Follow the visitor's `prefers-color-scheme` instead of forcing dark.
    pub auto: bool,
}

fn default_enabled() -> bool {
    true
}

/// A positionable content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled", deserialize_with = "deserialize_enabled")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "deserialize_order")]
    pub order: i64,
    #[serde(default, deserialize_with = "deserialize_area")]
    pub area: LayoutArea,
    #[serde(default, skip_serializing_if = "SectionConfig::is_empty")]
    pub config: SectionConfig,
    /// Free-form settings carried over from older saved configurations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
}

impl Section {
    pub fn new(id: &str, name: &str, order: i64, area: LayoutArea) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
            order,
            area,
            config: SectionConfig::default(),
            props: None,
        }
    }

    pub fn with_columns(mut self, columns: i64) -> Self {
        self.config.columns = Some(columns);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Requested grid column count, from `config` or the legacy `props` bag.
    pub fn columns(&self) -> Option<i64> {
        self.config.columns.or_else(|| {
            self.props
                .as_ref()?
                .get("columns")
                .and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()))
        })
    }

    /// Heading shown for this section, falling back to `default`.
    pub fn title<'a>(&'a self, default: &'a str) -> &'a str {
        self.config
            .title
            .as_deref()
            .or(Some(self.name.as_str()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(default)
    }
}

/// Known per-section settings. Unknown keys are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SectionConfig {
    pub fn is_empty(&self) -> bool {
        self.columns.is_none() && self.title.is_none()
    }
}

/// A user overlay on top of a template.
///
/// Every facet is optional. `sections`, when present and non-empty, replaces
/// the template's section list as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<AnimationsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<DarkModePatch>,
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        *self == Customization::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextColorsPatch>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub gradient: Patch<GradientPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextColorsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamilyPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSizesPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeightsPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFamilyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xl: Option<String>,
    #[serde(rename = "2xl", skip_serializing_if = "Option::is_none")]
    pub xl2: Option<String>,
    #[serde(rename = "3xl", skip_serializing_if = "Option::is_none")]
    pub xl3: Option<String>,
    #[serde(rename = "4xl", skip_serializing_if = "Option::is_none")]
    pub xl4: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontWeightsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semibold: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiiPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<RadiiPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowsPatch>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnimationKind>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DarkModePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gradient_css_uses_default_direction() {
        let gradient = Gradient {
            from: "#111".into(),
            to: "#222".into(),
            direction: None,
        };
        assert_eq!(
            gradient.css().as_deref(),
            Some("linear-gradient(135deg, #111, #222)")
        );
    }

    #[test]
    fn gradient_with_blank_end_is_ignored() {
        let gradient = Gradient::new("#111", "  ", "45deg");
        assert_eq!(gradient.css(), None);
    }

    #[test]
    fn section_reads_legacy_props_columns() {
        let section: Section = serde_json::from_str(
            r#"{"id": "projects", "props": {"columns": "4"}}"#,
        )
        .unwrap();

        assert_eq!(section.columns(), Some(4));
        assert!(section.enabled);
        assert_eq!(section.area, LayoutArea::Main);
    }

    #[test]
    fn section_title_prefers_config_then_name() {
        let mut section = Section::new("about", "About me", 1, LayoutArea::Main);
        assert_eq!(section.title("About"), "About me");

        section.config.title = Some("Who I am".into());
        assert_eq!(section.title("About"), "Who I am");

        section.config.title = None;
        section.name = String::new();
        assert_eq!(section.title("About"), "About");
    }

    #[test]
    fn customization_ignores_unknown_keys() {
        let customization: Customization = serde_json::from_str(
            r##"{"colors": {"primary": "#f00", "sparkle": true}, "plugins": ["x"]}"##,
        )
        .unwrap();

        assert_eq!(
            customization.colors.unwrap().primary.as_deref(),
            Some("#f00")
        );
    }

    #[test]
    fn empty_customization_serializes_to_empty_object() {
        let json = serde_json::to_string(&Customization::default()).unwrap();
        assert_eq!(json, "{}");
        assert!(Customization::default().is_empty());
    }

    #[test]
    fn template_tolerates_missing_facets() {
        let template: Template =
            serde_json::from_str(r#"{"id": "bare", "name": "Bare"}"#).unwrap();

        assert_eq!(template.colors.primary, fallback::PRIMARY);
        assert_eq!(template.layout.spacing.md, fallback::SP_MD);
        assert!(!template.is_custom);
    }
}
