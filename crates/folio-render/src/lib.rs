//! Section rendering for folio portfolios.
//!
//! Sections are written once against the [`Markup`] trait and rendered
//! through one of two adapters: [`DomBuilder`] builds a node tree for the
//! live preview, [`HtmlWriter`] writes HTML text for static export. Both are
//! driven by the same dispatch table, so the preview and the exported site
//! cannot drift apart.

pub mod live;
pub mod markup;
pub mod page;
pub mod sections;

pub use live::LiveRenderer;
pub use markup::{escape_html, Action, DomBuilder, Element, HtmlWriter, Markup, Node};
pub use page::{
    area_has_content, render_area, render_page, render_project_detail, render_project_sections,
    RenderContext, RenderMode,
};
pub use sections::{clamp_columns, SectionKind};
