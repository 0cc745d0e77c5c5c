//! Built-in template catalog, presets and user custom templates.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::merge::Patch;
use crate::portfolio::slug;
use crate::section::LayoutArea;
use crate::template::{
    AnimationKind, Animations, Colors, ColorsPatch, DarkMode, FontFamily, FontFamilyPatch,
    Gradient, GradientPatch, Layout, LayoutPatch, RadiiPatch, Section, ShadowsPatch,
    SpacingPatch, Template, TemplateCategory, TextColors, Typography,
};

/// Template used when a saved id is missing or unknown.
pub const DEFAULT_TEMPLATE_ID: &str = "modern";

/// The section arrangement most built-in templates start from.
fn standard_sections(project_columns: i64) -> Vec<Section> {
    vec![
        Section::new("header", "Header", 0, LayoutArea::Header),
        Section::new("about", "About", 1, LayoutArea::Main),
        Section::new("projects", "Projects", 2, LayoutArea::Main).with_columns(project_columns),
        Section::new("skills", "Skills", 3, LayoutArea::Main).with_columns(2),
        Section::new("experience", "Experience", 4, LayoutArea::Main),
        Section::new("contact", "Contact", 5, LayoutArea::Footer),
    ]
}

fn colors(
    primary: &str,
    secondary: &str,
    accent: &str,
    background: &str,
    surface: &str,
    text: [&str; 3],
    gradient: Option<Gradient>,
) -> Colors {
    Colors {
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        accent: accent.to_string(),
        background: background.to_string(),
        surface: surface.to_string(),
        text: TextColors {
            primary: text[0].to_string(),
            secondary: text[1].to_string(),
            accent: text[2].to_string(),
        },
        gradient,
    }
}

fn fonts(primary: &str, heading: &str, code: &str) -> Typography {
    Typography {
        font_family: FontFamily {
            primary: primary.to_string(),
            heading: heading.to_string(),
            code: code.to_string(),
        },
        ..Default::default()
    }
}

fn builtin_templates() -> Vec<Template> {
    let modern = Template {
        id: "modern".to_string(),
        name: "Modern".to_string(),
        category: TemplateCategory::Modern,
        description: "Bold gradient header with card-based project grid".to_string(),
        colors: colors(
            "#2563eb",
            "#7c3aed",
            "#06b6d4",
            "#ffffff",
            "#f8fafc",
            ["#0f172a", "#475569", "#2563eb"],
            Some(Gradient::new("#2563eb", "#7c3aed", "135deg")),
        ),
        typography: Typography::default(),
        layout: Layout::default(),
        sections: standard_sections(3),
        animations: Animations {
            enabled: true,
            kind: AnimationKind::Fade,
        },
        dark_mode: DarkMode::default(),
        is_custom: false,
    };

    let mut minimal_layout = Layout::default();
    minimal_layout.max_width = "960px".to_string();
    minimal_layout.border_radius.sm = "0".to_string();
    minimal_layout.border_radius.md = "0".to_string();
    minimal_layout.border_radius.lg = "0".to_string();
    minimal_layout.shadow.md = "none".to_string();

    let minimal = Template {
        id: "minimal".to_string(),
        name: "Minimal".to_string(),
        category: TemplateCategory::Minimal,
        description: "Monochrome, generous whitespace, no decoration".to_string(),
        colors: colors(
            "#111111",
            "#444444",
            "#888888",
            "#ffffff",
            "#fafafa",
            ["#111111", "#555555", "#111111"],
            None,
        ),
        typography: fonts(
            "'Helvetica Neue', Helvetica, Arial, sans-serif",
            "'Helvetica Neue', Helvetica, Arial, sans-serif",
            "Menlo, Consolas, monospace",
        ),
        layout: minimal_layout,
        sections: standard_sections(2),
        animations: Animations::default(),
        dark_mode: DarkMode::default(),
        is_custom: false,
    };

    let mut creative_layout = Layout::default();
    creative_layout.border_radius.md = "1rem".to_string();
    creative_layout.border_radius.lg = "2rem".to_string();

    let creative = Template {
        id: "creative".to_string(),
        name: "Creative".to_string(),
        category: TemplateCategory::Creative,
        description: "Vivid colors and playful shapes for designers and artists".to_string(),
        colors: colors(
            "#ec4899",
            "#8b5cf6",
            "#f59e0b",
            "#fffbf5",
            "#fff1f7",
            ["#1f1235", "#5b4b70", "#ec4899"],
            Some(Gradient::new("#ec4899", "#f59e0b", "45deg")),
        ),
        typography: fonts(
            "'Poppins', system-ui, sans-serif",
            "'Playfair Display', Georgia, serif",
            "'Fira Code', monospace",
        ),
        layout: creative_layout,
        sections: standard_sections(3),
        animations: Animations {
            enabled: true,
            kind: AnimationKind::Zoom,
        },
        dark_mode: DarkMode::default(),
        is_custom: false,
    };

    let professional = Template {
        id: "professional".to_string(),
        name: "Professional".to_string(),
        category: TemplateCategory::Professional,
        description: "Conservative layout that leads with experience".to_string(),
        colors: colors(
            "#1e3a8a",
            "#0f766e",
            "#b45309",
            "#ffffff",
            "#f1f5f9",
            ["#1e293b", "#475569", "#1e3a8a"],
            None,
        ),
        typography: fonts(
            "'Source Sans Pro', Arial, sans-serif",
            "'Merriweather', Georgia, serif",
            "'Source Code Pro', monospace",
        ),
        layout: Layout::default(),
        sections: vec![
            Section::new("header", "Header", 0, LayoutArea::Header),
            Section::new("about", "Profile", 1, LayoutArea::Main),
            Section::new("experience", "Experience", 2, LayoutArea::Main),
            Section::new("projects", "Selected Work", 3, LayoutArea::Main).with_columns(2),
            Section::new("skills", "Skills", 4, LayoutArea::SidebarRight).with_columns(1),
            Section::new("contact", "Contact", 5, LayoutArea::Footer),
        ],
        animations: Animations {
            enabled: true,
            kind: AnimationKind::Slide,
        },
        dark_mode: DarkMode::default(),
        is_custom: false,
    };

    let developer = Template {
        id: "developer".to_string(),
        name: "Developer".to_string(),
        category: TemplateCategory::Developer,
        description: "Dark, terminal-inspired theme for engineers".to_string(),
        colors: colors(
            "#22c55e",
            "#0ea5e9",
            "#f97316",
            "#0d1117",
            "#161b22",
            ["#e6edf3", "#8b949e", "#22c55e"],
            Some(Gradient::new("#0d1117", "#161b22", "180deg")),
        ),
        typography: fonts(
            "'Inter', system-ui, sans-serif",
            "'JetBrains Mono', ui-monospace, monospace",
            "'JetBrains Mono', ui-monospace, monospace",
        ),
        layout: Layout::default(),
        sections: {
            let mut sections = standard_sections(3);
            if let Some(skills) = sections.iter_mut().find(|s| s.id == "skills") {
                skills.config.columns = Some(3);
            }
            sections
        },
        animations: Animations {
            enabled: true,
            kind: AnimationKind::Fade,
        },
        dark_mode: DarkMode {
            enabled: false,
            auto: false,
        },
        is_custom: false,
    };

    vec![modern, minimal, creative, professional, developer]
}

/// A named color palette that can be dropped into a customization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: ColorsPatch,
}

/// A named font pairing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub font_family: FontFamilyPatch,
}

/// A named spacing/shape density.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub layout: LayoutPatch,
}

fn palette(primary: &str, secondary: &str, accent: &str, gradient: bool) -> ColorsPatch {
    ColorsPatch {
        primary: Some(primary.to_string()),
        secondary: Some(secondary.to_string()),
        accent: Some(accent.to_string()),
        gradient: if gradient {
            Patch::Set(GradientPatch {
                from: Some(primary.to_string()),
                to: Some(secondary.to_string()),
                direction: None,
            })
        } else {
            Patch::Clear
        },
        ..Default::default()
    }
}

pub fn color_presets() -> Vec<ColorPreset> {
    vec![
        ColorPreset {
            id: "ocean",
            name: "Ocean",
            colors: palette("#0369a1", "#0891b2", "#22d3ee", true),
        },
        ColorPreset {
            id: "forest",
            name: "Forest",
            colors: palette("#166534", "#15803d", "#84cc16", true),
        },
        ColorPreset {
            id: "sunset",
            name: "Sunset",
            colors: palette("#ea580c", "#db2777", "#facc15", true),
        },
        ColorPreset {
            id: "graphite",
            name: "Graphite",
            colors: palette("#1f2937", "#4b5563", "#9ca3af", false),
        },
    ]
}

pub fn typography_presets() -> Vec<TypographyPreset> {
    let pairing = |primary: &str, heading: &str| FontFamilyPatch {
        primary: Some(primary.to_string()),
        heading: Some(heading.to_string()),
        code: None,
    };
    vec![
        TypographyPreset {
            id: "sans",
            name: "Clean Sans",
            font_family: pairing("'Inter', system-ui, sans-serif", "'Inter', system-ui, sans-serif"),
        },
        TypographyPreset {
            id: "editorial",
            name: "Editorial",
            font_family: pairing("'Source Serif Pro', Georgia, serif", "'Playfair Display', Georgia, serif"),
        },
        TypographyPreset {
            id: "technical",
            name: "Technical",
            font_family: pairing("'IBM Plex Sans', sans-serif", "'IBM Plex Mono', monospace"),
        },
    ]
}

pub fn layout_presets() -> Vec<LayoutPreset> {
    let density = |max_width: &str, md: &str, lg: &str, xl: &str, radius: &str| LayoutPatch {
        max_width: Some(max_width.to_string()),
        spacing: Some(SpacingPatch {
            md: Some(md.to_string()),
            lg: Some(lg.to_string()),
            xl: Some(xl.to_string()),
            ..Default::default()
        }),
        border_radius: Some(RadiiPatch {
            md: Some(radius.to_string()),
            ..Default::default()
        }),
        shadow: None::<ShadowsPatch>,
    };
    vec![
        LayoutPreset {
            id: "compact",
            name: "Compact",
            layout: density("1080px", "0.75rem", "1.5rem", "2.5rem", "0.25rem"),
        },
        LayoutPreset {
            id: "comfortable",
            name: "Comfortable",
            layout: density("1200px", "1rem", "2rem", "4rem", "0.5rem"),
        },
        LayoutPreset {
            id: "spacious",
            name: "Spacious",
            layout: density("1320px", "1.5rem", "3rem", "6rem", "1rem"),
        },
    ]
}

/// Keys a custom template must carry before it is accepted.
const REQUIRED_TEMPLATE_KEYS: &[&str] = &["id", "name", "colors", "typography", "layout", "sections"];

/// Built-in templates plus the user's custom ones.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    builtin: Vec<Template>,
    custom: Vec<Template>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Create a registry holding only the built-in templates.
    pub fn new() -> Self {
        Self {
            builtin: builtin_templates(),
            custom: Vec::new(),
        }
    }

    /// Look up a template by id (built-ins first).
    pub fn get(&self, id: &str) -> Option<&Template> {
        let id = id.trim();
        self.builtin
            .iter()
            .chain(self.custom.iter())
            .find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up a template, falling back to [`DEFAULT_TEMPLATE_ID`].
    pub fn resolve_id(&self, id: Option<&str>) -> &Template {
        if let Some(template) = id.and_then(|id| self.get(id)) {
            return template;
        }
        if let Some(id) = id {
            tracing::warn!("Unknown template '{}', using '{}'", id, DEFAULT_TEMPLATE_ID);
        }
        self.default_template()
    }

    pub fn default_template(&self) -> &Template {
        self.builtin
            .iter()
            .find(|t| t.id == DEFAULT_TEMPLATE_ID)
            .unwrap_or(&self.builtin[0])
    }

    /// All templates, built-ins first.
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn builtin(&self) -> &[Template] {
        &self.builtin
    }

    pub fn custom(&self) -> &[Template] {
        &self.custom
    }

    /// Copy an existing template into a new custom template.
    ///
    /// Returns the new template, or `None` if `id` is unknown.
    pub fn duplicate(&mut self, id: &str, name: &str) -> Option<&Template> {
        let copy = self.get(id)?.clone();
        Some(self.add_custom(copy, name))
    }

    /// Store `template` as a new custom template under a fresh id.
    pub fn add_custom(&mut self, mut template: Template, name: &str) -> &Template {
        let name = if name.trim().is_empty() {
            format!("{} (copy)", template.name)
        } else {
            name.trim().to_string()
        };
        template.id = self.unique_custom_id(&name);
        template.name = name;
        template.is_custom = true;
        self.custom.push(template);
        &self.custom[self.custom.len() - 1]
    }

    fn unique_custom_id(&self, name: &str) -> String {
        let base = match slug(name) {
            s if s.is_empty() => "custom".to_string(),
            s => format!("custom-{}", s),
        };
        let mut candidate = base.clone();
        let mut n = 2;
        while self.contains(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        candidate
    }

    /// Accept a custom template from JSON.
    ///
    /// The JSON must be an object carrying every required key with a
    /// non-blank string `id` that does not shadow a built-in. Returns `false`
    /// and leaves the registry untouched otherwise. A custom template with the
    /// same id is replaced.
    pub fn import_custom(&mut self, json: &str) -> bool {
        let Ok(value) = serde_json::from_str::<Value>(json) else {
            tracing::warn!("Rejected custom template: not valid JSON");
            return false;
        };
        self.import_custom_value(value)
    }

    fn import_custom_value(&mut self, value: Value) -> bool {
        let Some(object) = value.as_object() else {
            tracing::warn!("Rejected custom template: not an object");
            return false;
        };
        if let Some(missing) = REQUIRED_TEMPLATE_KEYS.iter().find(|k| !object.contains_key(**k)) {
            tracing::warn!("Rejected custom template: missing '{}'", missing);
            return false;
        }
        let id = object.get("id").and_then(Value::as_str).unwrap_or("").trim();
        if id.is_empty() || self.builtin.iter().any(|t| t.id == id) {
            tracing::warn!("Rejected custom template: invalid id '{}'", id);
            return false;
        }
        if !object.get("sections").is_some_and(Value::is_array) {
            tracing::warn!("Rejected custom template '{}': sections is not a list", id);
            return false;
        }

        let mut template: Template = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Rejected custom template: {}", e);
                return false;
            }
        };
        template.id = template.id.trim().to_string();
        template.is_custom = true;

        self.custom.retain(|t| t.id != template.id);
        self.custom.push(template);
        true
    }

    /// Remove a custom template. Built-ins cannot be removed.
    pub fn remove_custom(&mut self, id: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|t| t.id != id);
        self.custom.len() != before
    }

    /// Replace the custom template list, e.g. from persisted state.
    pub fn set_custom(&mut self, templates: Vec<Template>) {
        self.custom.clear();
        for template in templates {
            match serde_json::to_value(&template) {
                Ok(value) => {
                    self.import_custom_value(value);
                }
                Err(e) => tracing::warn!("Skipping custom template '{}': {}", template.id, e),
            }
        }
    }

    /// Load every `*.json` file under `dir` as a custom template.
    ///
    /// Invalid files are skipped with a warning. Returns how many were loaded.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        if !dir.exists() {
            return 0;
        }

        let mut count = 0;
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let source = match fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };
            if self.import_custom(&source) {
                count += 1;
            } else {
                tracing::warn!("Skipped invalid template file {}", path.display());
            }
        }
        count
    }
}
