//! CSS custom properties and rules generated from an effective template.
//!
//! The live preview and the static exporter both serialize the same
//! [`Theme`]; the variable naming table below is the only place names are
//! decided.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::resolve::EffectiveTemplate;
use crate::template::{fallback, AnimationKind};

type Getter = fn(&EffectiveTemplate) -> String;

fn pick(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        v => v.to_string(),
    }
}

fn weight(value: u16, fallback: u16) -> String {
    let value = if value == 0 { fallback } else { value };
    value.to_string()
}

fn forced_dark(t: &EffectiveTemplate) -> bool {
    t.dark_mode.enabled && !t.dark_mode.auto
}

/// Header background: the gradient when both ends are set, else primary.
pub fn header_background(t: &EffectiveTemplate) -> String {
    t.colors
        .gradient
        .as_ref()
        .and_then(|g| g.css())
        .unwrap_or_else(|| pick(&t.colors.primary, fallback::PRIMARY))
}

/// Every generated custom property, in output order.
static VARIABLES: &[(&str, Getter)] = &[
    ("--color-primary", |t| pick(&t.colors.primary, fallback::PRIMARY)),
    ("--color-secondary", |t| pick(&t.colors.secondary, fallback::SECONDARY)),
    ("--color-accent", |t| pick(&t.colors.accent, fallback::ACCENT)),
    ("--color-background", |t| {
        if forced_dark(t) {
            fallback::DARK_BACKGROUND.to_string()
        } else {
            pick(&t.colors.background, fallback::BACKGROUND)
        }
    }),
    ("--color-surface", |t| {
        if forced_dark(t) {
            fallback::DARK_SURFACE.to_string()
        } else {
            pick(&t.colors.surface, fallback::SURFACE)
        }
    }),
    ("--color-text-primary", |t| {
        if forced_dark(t) {
            fallback::DARK_TEXT_PRIMARY.to_string()
        } else {
            pick(&t.colors.text.primary, fallback::TEXT_PRIMARY)
        }
    }),
    ("--color-text-secondary", |t| {
        if forced_dark(t) {
            fallback::DARK_TEXT_SECONDARY.to_string()
        } else {
            pick(&t.colors.text.secondary, fallback::TEXT_SECONDARY)
        }
    }),
    ("--color-text-accent", |t| pick(&t.colors.text.accent, fallback::TEXT_ACCENT)),
    ("--font-primary", |t| pick(&t.typography.font_family.primary, fallback::FONT_PRIMARY)),
    ("--font-heading", |t| pick(&t.typography.font_family.heading, fallback::FONT_HEADING)),
    ("--font-code", |t| pick(&t.typography.font_family.code, fallback::FONT_CODE)),
    ("--fs-xs", |t| pick(&t.typography.font_size.xs, fallback::FS_XS)),
    ("--fs-sm", |t| pick(&t.typography.font_size.sm, fallback::FS_SM)),
    ("--fs-base", |t| pick(&t.typography.font_size.base, fallback::FS_BASE)),
    ("--fs-lg", |t| pick(&t.typography.font_size.lg, fallback::FS_LG)),
    ("--fs-xl", |t| pick(&t.typography.font_size.xl, fallback::FS_XL)),
    ("--fs-2xl", |t| pick(&t.typography.font_size.xl2, fallback::FS_2XL)),
    ("--fs-3xl", |t| pick(&t.typography.font_size.xl3, fallback::FS_3XL)),
    ("--fs-4xl", |t| pick(&t.typography.font_size.xl4, fallback::FS_4XL)),
    ("--fw-light", |t| weight(t.typography.font_weight.light, fallback::FW_LIGHT)),
    ("--fw-normal", |t| weight(t.typography.font_weight.normal, fallback::FW_NORMAL)),
    ("--fw-medium", |t| weight(t.typography.font_weight.medium, fallback::FW_MEDIUM)),
    ("--fw-semibold", |t| weight(t.typography.font_weight.semibold, fallback::FW_SEMIBOLD)),
    ("--fw-bold", |t| weight(t.typography.font_weight.bold, fallback::FW_BOLD)),
    ("--max-width", |t| pick(&t.layout.max_width, fallback::MAX_WIDTH)),
    ("--sp-xs", |t| pick(&t.layout.spacing.xs, fallback::SP_XS)),
    ("--sp-sm", |t| pick(&t.layout.spacing.sm, fallback::SP_SM)),
    ("--sp-md", |t| pick(&t.layout.spacing.md, fallback::SP_MD)),
    ("--sp-lg", |t| pick(&t.layout.spacing.lg, fallback::SP_LG)),
    ("--sp-xl", |t| pick(&t.layout.spacing.xl, fallback::SP_XL)),
    ("--radius-sm", |t| pick(&t.layout.border_radius.sm, fallback::RADIUS_SM)),
    ("--radius-md", |t| pick(&t.layout.border_radius.md, fallback::RADIUS_MD)),
    ("--radius-lg", |t| pick(&t.layout.border_radius.lg, fallback::RADIUS_LG)),
    ("--radius-full", |t| pick(&t.layout.border_radius.full, fallback::RADIUS_FULL)),
    ("--shadow-sm", |t| pick(&t.layout.shadow.sm, fallback::SHADOW_SM)),
    ("--shadow-md", |t| pick(&t.layout.shadow.md, fallback::SHADOW_MD)),
    ("--shadow-lg", |t| pick(&t.layout.shadow.lg, fallback::SHADOW_LG)),
    ("--shadow-xl", |t| pick(&t.layout.shadow.xl, fallback::SHADOW_XL)),
    ("--header-bg", header_background),
];

/// Generated theme: custom properties plus the rules that consume them.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    variables: Vec<(String, String)>,
    /// Value of `--header-bg`.
    pub header_background: String,
    /// Rule text (without the `:root` block), custom CSS appended last.
    pub rules: String,
}

impl Theme {
    pub fn variables(&self) -> &[(String, String)] {
        &self.variables
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn variable_map(&self) -> BTreeMap<String, String> {
        self.variables.iter().cloned().collect()
    }

    /// Declarations for an inline `style` attribute.
    pub fn inline_style(&self) -> String {
        self.variables
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// A `:root { ... }` block declaring every variable.
    pub fn root_block(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.variables {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push_str("}\n");
        css
    }

    /// Root block followed by the rules.
    pub fn stylesheet(&self) -> String {
        format!("{}\n{}", self.root_block(), self.rules)
    }
}

/// Build the theme for an effective template.
pub fn generate_theme(template: &EffectiveTemplate) -> Theme {
    let variables: Vec<(String, String)> = VARIABLES
        .iter()
        .map(|(name, getter)| (name.to_string(), getter(template)))
        .collect();

    let mut rules = String::from(BASE_RULES);

    if template.animations.enabled && template.animations.kind != AnimationKind::None {
        rules.push_str(&animation_rules(template.animations.kind));
    }

    if template.dark_mode.enabled && template.dark_mode.auto {
        rules.push_str(&format!(
            "\n@media (prefers-color-scheme: dark) {{\n  :root {{\n    --color-background: {};\n    --color-surface: {};\n    --color-text-primary: {};\n    --color-text-secondary: {};\n  }}\n}}\n",
            fallback::DARK_BACKGROUND,
            fallback::DARK_SURFACE,
            fallback::DARK_TEXT_PRIMARY,
            fallback::DARK_TEXT_SECONDARY,
        ));
    }

    if let Some(custom) = &template.custom_css {
        rules.push_str("\n/* Custom CSS */\n");
        rules.push_str(&contain_custom_css(custom.trim()));
        rules.push('\n');
    }

    Theme {
        header_background: header_background(template),
        variables,
        rules,
    }
}

static STYLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").expect("Invalid style close regex"));

/// User CSS is inlined in a `<style>` element and must not be able to end it.
fn contain_custom_css(css: &str) -> String {
    STYLE_CLOSE.replace_all(css, r"<\/$1").into_owned()
}

fn animation_rules(kind: AnimationKind) -> String {
    let from = match kind {
        AnimationKind::Slide => "opacity: 0; transform: translateY(24px);",
        AnimationKind::Zoom => "opacity: 0; transform: scale(0.96);",
        AnimationKind::Fade | AnimationKind::None => "opacity: 0;",
    };
    format!(
        "\n@keyframes folio-{name} {{\n  from {{ {from} }}\n  to {{ opacity: 1; transform: none; }}\n}}\n\n.section {{\n  animation: folio-{name} 0.6s ease both;\n}}\n\n@media (prefers-reduced-motion: reduce) {{\n  .section {{ animation: none; }}\n}}\n",
        name = kind.as_str(),
        from = from,
    )
}

const BASE_RULES: &str = r#"* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: var(--font-primary);
  font-size: var(--fs-base);
  font-weight: var(--fw-normal);
  background: var(--color-background);
  color: var(--color-text-primary);
  line-height: 1.6;
}

h1, h2, h3, h4 {
  font-family: var(--font-heading);
  font-weight: var(--fw-bold);
  line-height: 1.25;
}

a {
  color: var(--color-text-accent);
}

code {
  font-family: var(--font-code);
}

.container {
  max-width: var(--max-width);
  margin: 0 auto;
  padding: 0 var(--sp-md);
}

/* Page areas */
.page-body {
  display: flex;
  gap: var(--sp-lg);
  max-width: var(--max-width);
  margin: 0 auto;
}

.area-main {
  flex: 1;
  min-width: 0;
}

.area-sidebar-left,
.area-sidebar-right {
  flex: 0 0 280px;
}

.area-floating {
  position: fixed;
  right: var(--sp-md);
  bottom: var(--sp-md);
  z-index: 50;
}

.section {
  padding: var(--sp-xl) 0;
}

.section-title {
  font-size: var(--fs-3xl);
  margin-bottom: var(--sp-lg);
  color: var(--color-text-primary);
}

/* Header */
.site-header {
  background: var(--header-bg);
  color: #ffffff;
  padding: var(--sp-xl) 0;
  text-align: center;
}

.site-header .avatar {
  width: 128px;
  height: 128px;
  border-radius: var(--radius-full);
  object-fit: cover;
  box-shadow: var(--shadow-lg);
  margin-bottom: var(--sp-md);
}

.site-header .name {
  font-size: var(--fs-4xl);
}

.site-header .headline {
  font-size: var(--fs-xl);
  opacity: 0.9;
}

.site-header .location {
  font-size: var(--fs-sm);
  opacity: 0.8;
}

.header-links {
  display: flex;
  justify-content: center;
  gap: var(--sp-md);
  margin-top: var(--sp-md);
}

.header-links a {
  color: inherit;
  font-weight: var(--fw-medium);
}

/* About */
.about-summary {
  font-size: var(--fs-lg);
  color: var(--color-text-secondary);
  white-space: pre-line;
}

.about-facts {
  list-style: none;
  display: flex;
  flex-wrap: wrap;
  gap: var(--sp-md);
  margin-top: var(--sp-md);
  color: var(--color-text-secondary);
}

/* Projects */
.projects-grid,
.skills-grid {
  display: grid;
  grid-template-columns: repeat(var(--grid-columns, 3), minmax(0, 1fr));
  gap: var(--sp-lg);
}

.project-card {
  background: var(--color-surface);
  border-radius: var(--radius-md);
  box-shadow: var(--shadow-md);
  overflow: hidden;
  display: flex;
  flex-direction: column;
}

.project-thumb {
  width: 100%;
  aspect-ratio: 16 / 9;
  object-fit: cover;
}

.project-body {
  padding: var(--sp-md);
  display: flex;
  flex-direction: column;
  gap: var(--sp-sm);
  flex: 1;
}

.project-title {
  font-size: var(--fs-xl);
}

.project-description {
  color: var(--color-text-secondary);
}

.tech-list {
  list-style: none;
  display: flex;
  flex-wrap: wrap;
  gap: var(--sp-xs);
}

.tech-tag {
  background: var(--color-background);
  color: var(--color-text-accent);
  border-radius: var(--radius-full);
  padding: var(--sp-xs) var(--sp-sm);
  font-size: var(--fs-xs);
}

.project-more {
  margin-top: auto;
  align-self: flex-start;
  background: var(--color-primary);
  color: #ffffff;
  border: none;
  border-radius: var(--radius-sm);
  padding: var(--sp-sm) var(--sp-md);
  font: inherit;
  text-decoration: none;
  cursor: pointer;
}

/* Skills */
.skill {
  background: var(--color-surface);
  border-radius: var(--radius-md);
  padding: var(--sp-md);
}

.skill-name {
  font-weight: var(--fw-semibold);
}

.skill-meta {
  color: var(--color-text-secondary);
  font-size: var(--fs-sm);
}

.skill-bar {
  height: 6px;
  background: var(--color-background);
  border-radius: var(--radius-full);
  margin-top: var(--sp-sm);
  overflow: hidden;
}

.skill-bar span {
  display: block;
  height: 100%;
  background: var(--color-accent);
}

/* Experience */
.timeline {
  list-style: none;
  border-left: 2px solid var(--color-primary);
  padding-left: var(--sp-lg);
}

.timeline-item {
  margin-bottom: var(--sp-lg);
}

.timeline-meta,
.timeline-dates {
  color: var(--color-text-secondary);
  font-size: var(--fs-sm);
}

.subsection-title {
  font-size: var(--fs-2xl);
  margin: var(--sp-lg) 0 var(--sp-md);
}

/* Contact */
.section-contact {
  background: var(--color-surface);
  text-align: center;
}

.contact-list {
  list-style: none;
  display: flex;
  flex-wrap: wrap;
  justify-content: center;
  gap: var(--sp-md);
}

.copyright {
  margin-top: var(--sp-lg);
  color: var(--color-text-secondary);
  font-size: var(--fs-sm);
}

/* Project details */
.project-detail {
  display: flex;
  flex-direction: column;
  gap: var(--sp-md);
}

.project-detail-title {
  font-size: var(--fs-3xl);
}

.project-gallery {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
  gap: var(--sp-md);
}

.project-gallery img {
  width: 100%;
  border-radius: var(--radius-md);
}

.project-video iframe,
.project-video video {
  width: 100%;
  aspect-ratio: 16 / 9;
  border: 0;
  border-radius: var(--radius-md);
}

.project-links {
  display: flex;
  gap: var(--sp-md);
}

.back-link {
  display: inline-block;
  margin: var(--sp-lg) 0;
}

/* Overlay */
.project-overlay {
  position: fixed;
  inset: 0;
  z-index: 100;
  display: flex;
  align-items: center;
  justify-content: center;
}

.overlay-backdrop {
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0.6);
}

.overlay-panel {
  position: relative;
  background: var(--color-background);
  border-radius: var(--radius-lg);
  box-shadow: var(--shadow-xl);
  max-width: min(960px, 92vw);
  max-height: 90vh;
  overflow-y: auto;
  padding: var(--sp-lg);
}

.overlay-close {
  position: absolute;
  top: var(--sp-sm);
  right: var(--sp-sm);
  background: none;
  border: none;
  font-size: var(--fs-2xl);
  color: var(--color-text-secondary);
  cursor: pointer;
}

@media (max-width: 768px) {
  .projects-grid,
  .skills-grid {
    grid-template-columns: minmax(0, 1fr);
  }

  .page-body {
    flex-direction: column;
  }

  .area-sidebar-left,
  .area-sidebar-right {
    flex-basis: auto;
  }
}
"#;
