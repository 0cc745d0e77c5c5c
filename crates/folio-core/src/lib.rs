//! Template configuration model for folio portfolios.
//!
//! This crate owns everything that decides *what* a portfolio looks like:
//! the built-in template catalog, the deep-merge engine that layers user
//! customizations onto a template, section normalization and placement,
//! template resolution, theme variable generation, the portfolio data model
//! and the persistence adapter used to keep all of it between sessions.

pub mod merge;
pub mod portfolio;
pub mod registry;
pub mod resolve;
pub mod section;
pub mod session;
pub mod store;
pub mod template;
pub mod theme;

pub use merge::{merge_deep, merge_facet, Patch};
pub use portfolio::{
    embed_video_url, is_direct_video, project_pages, slug, Achievement, DelimitedList, Education,
    Experience, PersonalInfo, PortfolioData, Project, ProjectPage, Skill,
};
pub use registry::{
    color_presets, layout_presets, typography_presets, ColorPreset, LayoutPreset,
    TemplateRegistry, TypographyPreset, DEFAULT_TEMPLATE_ID,
};
pub use resolve::{resolve, EffectiveTemplate, TemplateConfig};
pub use section::{group_by_area, is_enabled, normalize_id, LayoutArea, SectionGroups};
pub use session::{EditorSession, SessionError};
pub use store::{FileStore, KeyValueStore, MemoryStore, PortfolioStore, StoreError};
pub use template::{
    AnimationKind, Animations, Colors, Customization, DarkMode, Layout, Section, SectionConfig,
    Template, TemplateCategory, Typography,
};
pub use theme::{generate_theme, Theme};
