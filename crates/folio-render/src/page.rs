//! Page assembly: areas in render order around the section dispatch.

use folio_core::{project_pages, EffectiveTemplate, LayoutArea, PortfolioData, ProjectPage};

use crate::markup::{Element, Markup};
use crate::sections::{self, SectionKind};

/// Where the rendered markup ends up, which decides how project cards link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Live preview: cards open the details overlay.
    #[default]
    Interactive,
    /// Multi-page export: cards link to `proyecto-<slug>.html`.
    StaticSite,
    /// Single document export: cards link to `#proyecto-<slug>`.
    SinglePage,
}

impl RenderMode {
    /// True for the server-side (exported) modes, which carry no click actions.
    pub fn is_ssr(&self) -> bool {
        !matches!(self, RenderMode::Interactive)
    }
}

/// Everything a section needs to render.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub data: &'a PortfolioData,
    pub template: &'a EffectiveTemplate,
    pub mode: RenderMode,
    pages: Vec<ProjectPage>,
}

impl<'a> RenderContext<'a> {
    pub fn new(data: &'a PortfolioData, template: &'a EffectiveTemplate, mode: RenderMode) -> Self {
        Self {
            data,
            template,
            mode,
            pages: project_pages(&data.projects),
        }
    }

    /// Pages for projects with a title, in project order.
    pub fn pages(&self) -> &[ProjectPage] {
        &self.pages
    }

    /// The page generated for the project at `index`, if it has one.
    pub fn page_for(&self, index: usize) -> Option<&ProjectPage> {
        self.pages.iter().find(|p| p.index == index)
    }
}

fn area_element(area: LayoutArea) -> Element {
    match area {
        LayoutArea::Header => Element::new("div").class("area-header"),
        LayoutArea::SidebarLeft => Element::new("aside").class("area-sidebar-left"),
        LayoutArea::Main => Element::new("main").class("area-main"),
        LayoutArea::SidebarRight => Element::new("aside").class("area-sidebar-right"),
        LayoutArea::Footer => Element::new("footer").class("area-footer"),
        LayoutArea::Floating => Element::new("div").class("area-floating"),
    }
}

/// True when at least one section placed in `area` produces output.
pub fn area_has_content(area: LayoutArea, ctx: &RenderContext) -> bool {
    ctx.template
        .structure
        .area(area)
        .iter()
        .any(|s| SectionKind::from_id(&s.id).is_some_and(|k| k.has_content(ctx)))
}

/// Render the sections placed in `area` inside the area's wrapper element.
///
/// Returns false (and writes nothing) when the area is empty.
pub fn render_area<M: Markup>(out: &mut M, area: LayoutArea, ctx: &RenderContext) -> bool {
    if !area_has_content(area, ctx) {
        return false;
    }

    out.open(area_element(area));
    for section in ctx.template.structure.area(area) {
        sections::render_section(out, section, ctx);
    }
    out.close();
    true
}

/// Render every area in [`LayoutArea::RENDER_ORDER`].
///
/// The two sidebars and the main area share a `page-body` row.
pub fn render_page<M: Markup>(out: &mut M, ctx: &RenderContext) {
    const BODY: [LayoutArea; 3] = [
        LayoutArea::SidebarLeft,
        LayoutArea::Main,
        LayoutArea::SidebarRight,
    ];

    render_area(out, LayoutArea::Header, ctx);

    if BODY.iter().any(|area| area_has_content(*area, ctx)) {
        out.open(Element::new("div").class("page-body container"));
        for area in BODY {
            render_area(out, area, ctx);
        }
        out.close();
    }

    render_area(out, LayoutArea::Footer, ctx);
    render_area(out, LayoutArea::Floating, ctx);
}

/// Standalone details for one project, as used by exported project pages.
///
/// Returns false when the project does not exist or has no page.
pub fn render_project_detail<M: Markup>(out: &mut M, index: usize, ctx: &RenderContext) -> bool {
    let (Some(project), Some(page)) = (ctx.data.projects.get(index), ctx.page_for(index)) else {
        return false;
    };

    out.open(Element::new("div").class("container"));
    out.text_element(
        Element::new("a").class("back-link").attr("href", "index.html"),
        "← Back to portfolio",
    );
    sections::project_details(out, project, Some(page), ctx);
    out.close();
    true
}

/// Details for every project with a page, each under its in-page anchor.
///
/// Used by single-page exports so `#proyecto-<slug>` links resolve.
pub fn render_project_sections<M: Markup>(out: &mut M, ctx: &RenderContext) -> bool {
    if ctx.pages.is_empty() {
        return false;
    }

    out.open(
        Element::new("section")
            .class("section section-project-details")
            .id("project-details"),
    );
    out.open(Element::new("div").class("container"));
    for page in &ctx.pages {
        if let Some(project) = ctx.data.projects.get(page.index) {
            sections::project_details(out, project, Some(page), ctx);
        }
    }
    out.close();
    out.close();
    true
}
