//! The section dispatch table and the section components.
//!
//! Every component is generic over [`Markup`], so the live tree and the
//! exported HTML come out of the same code.

use folio_core::{is_direct_video, normalize_id, PortfolioData, Project, ProjectPage, Section};
use std::ops::RangeInclusive;

use crate::markup::{Action, Element, Markup};
use crate::page::{RenderContext, RenderMode};

const PROJECT_COLUMNS: i64 = 3;
const PROJECT_COLUMN_RANGE: RangeInclusive<i64> = 2..=4;
const SKILL_COLUMNS: i64 = 2;
const SKILL_COLUMN_RANGE: RangeInclusive<i64> = 1..=4;

/// Section components known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    About,
    Projects,
    Skills,
    Experience,
    Contact,
}

impl SectionKind {
    /// Look up the component for a section id. Aliases are resolved first.
    pub fn from_id(id: &str) -> Option<Self> {
        match normalize_id(id).as_str() {
            "header" => Some(Self::Header),
            "about" => Some(Self::About),
            "projects" => Some(Self::Projects),
            "skills" => Some(Self::Skills),
            "experience" => Some(Self::Experience),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    /// Whether the component has data to show. The header always renders.
    pub fn has_content(&self, ctx: &RenderContext) -> bool {
        let data = ctx.data;
        match self {
            Self::Header => true,
            Self::About => !data.personal.summary.trim().is_empty() || !about_facts(data).is_empty(),
            Self::Projects => data.projects.iter().any(is_listed),
            Self::Skills => data.skills.iter().any(|s| !s.name.trim().is_empty()),
            Self::Experience => {
                !data.experience.is_empty()
                    || !data.education.is_empty()
                    || !data.achievements.is_empty()
            }
            Self::Contact => !contact_links(data).is_empty() || !data.personal.name.trim().is_empty(),
        }
    }

    fn render<M: Markup>(&self, out: &mut M, section: &Section, ctx: &RenderContext) {
        match self {
            Self::Header => header(out, ctx),
            Self::About => about(out, section, ctx),
            Self::Projects => projects(out, section, ctx),
            Self::Skills => skills(out, section, ctx),
            Self::Experience => experience(out, section, ctx),
            Self::Contact => contact(out, section, ctx),
        }
    }
}

/// Requested column count, or `default`, clamped into `range`.
pub fn clamp_columns(requested: Option<i64>, default: i64, range: RangeInclusive<i64>) -> i64 {
    requested
        .unwrap_or(default)
        .clamp(*range.start(), *range.end())
}

/// Render one section through the dispatch table.
///
/// Unknown ids and sections without data produce no output.
pub(crate) fn render_section<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    match SectionKind::from_id(&section.id) {
        Some(kind) if kind.has_content(ctx) => kind.render(out, section, ctx),
        Some(_) => {}
        None => tracing::debug!("No renderer for section '{}'", section.id),
    }
}

fn is_listed(project: &Project) -> bool {
    project.has_title() || !project.description.trim().is_empty()
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn open_section<M: Markup>(out: &mut M, id: &str, section: &Section, default_title: &str) {
    out.open(
        Element::new("section")
            .class(&format!("section section-{}", id))
            .id(id),
    );
    out.text_element(
        Element::new("h2").class("section-title"),
        section.title(default_title),
    );
}

fn external_link<M: Markup>(out: &mut M, href: &str, label: &str) {
    out.text_element(
        Element::new("a")
            .attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer"),
        label,
    );
}

fn header<M: Markup>(out: &mut M, ctx: &RenderContext) {
    let personal = &ctx.data.personal;

    out.open(Element::new("header").class("section site-header").id("header"));
    out.open(Element::new("div").class("container"));

    if let Some(avatar) = non_blank(&personal.avatar) {
        out.void(
            Element::new("img")
                .class("avatar")
                .attr("src", avatar)
                .attr("alt", personal.name.trim()),
        );
    }
    out.text_element(
        Element::new("h1").class("name"),
        non_blank(&personal.name).unwrap_or("Your Name"),
    );
    if let Some(title) = non_blank(&personal.title) {
        out.text_element(Element::new("p").class("headline"), title);
    }
    if let Some(location) = non_blank(&personal.location) {
        out.text_element(Element::new("p").class("location"), location);
    }

    let links = profile_links(ctx.data);
    if !links.is_empty() {
        out.open(Element::new("nav").class("header-links"));
        for (label, href) in links {
            external_link(out, &href, label);
        }
        out.close();
    }

    out.close();
    out.close();
}

fn profile_links(data: &PortfolioData) -> Vec<(&'static str, String)> {
    let personal = &data.personal;
    [
        ("Email", non_blank(&personal.email).map(|e| format!("mailto:{}", e))),
        ("Website", non_blank(&personal.website).map(str::to_string)),
        ("LinkedIn", non_blank(&personal.linkedin).map(str::to_string)),
        ("GitHub", non_blank(&personal.github).map(str::to_string)),
    ]
    .into_iter()
    .filter_map(|(label, href)| Some((label, href?)))
    .collect()
}

fn about_facts(data: &PortfolioData) -> Vec<(&'static str, &str)> {
    let personal = &data.personal;
    [
        ("Role", personal.title.as_str()),
        ("Location", personal.location.as_str()),
        ("Email", personal.email.as_str()),
    ]
    .into_iter()
    .filter_map(|(label, value)| Some((label, non_blank(value)?)))
    .collect()
}

fn about<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    open_section(out, "about", section, "About");

    if let Some(summary) = non_blank(&ctx.data.personal.summary) {
        for paragraph in summary.split("\n\n").filter_map(non_blank) {
            out.text_element(Element::new("p").class("about-summary"), paragraph);
        }
    }

    let facts = about_facts(ctx.data);
    if !facts.is_empty() {
        out.open(Element::new("ul").class("about-facts"));
        for (label, value) in facts {
            out.open(Element::new("li"));
            out.text_element(Element::new("strong"), label);
            out.text(&format!(" {}", value));
            out.close();
        }
        out.close();
    }

    out.close();
}

fn grid(class: &str, columns: i64) -> Element {
    Element::new("div")
        .class(class)
        .attr("data-columns", columns.to_string())
        .attr("style", format!("--grid-columns: {}", columns))
}

fn tech_list<M: Markup>(out: &mut M, project: &Project) {
    let technologies = project.technologies();
    if technologies.is_empty() {
        return;
    }
    out.open(Element::new("ul").class("tech-list"));
    for tech in technologies.iter() {
        out.text_element(Element::new("li").class("tech-tag"), tech);
    }
    out.close();
}

fn projects<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    let columns = clamp_columns(section.columns(), PROJECT_COLUMNS, PROJECT_COLUMN_RANGE);

    open_section(out, "projects", section, "Projects");
    out.open(grid("projects-grid", columns));

    for (index, project) in ctx.data.projects.iter().enumerate() {
        if is_listed(project) {
            project_card(out, index, project, ctx);
        }
    }

    out.close();
    out.close();
}

fn project_card<M: Markup>(out: &mut M, index: usize, project: &Project, ctx: &RenderContext) {
    out.open(Element::new("article").class("project-card"));

    if let Some(image) = project.images().first() {
        out.void(
            Element::new("img")
                .class("project-thumb")
                .attr("src", image)
                .attr("alt", project.title.trim())
                .attr("loading", "lazy"),
        );
    }

    out.open(Element::new("div").class("project-body"));
    if let Some(title) = non_blank(&project.title) {
        out.text_element(Element::new("h3").class("project-title"), title);
    }
    if let Some(description) = non_blank(&project.description) {
        out.text_element(Element::new("p").class("project-description"), description);
    }
    tech_list(out, project);

    if let Some(page) = ctx.page_for(index) {
        match ctx.mode {
            RenderMode::Interactive => out.text_element(
                Element::new("button")
                    .class("project-more")
                    .attr("type", "button")
                    .on_click(Action::OpenProject { index }),
                "View details",
            ),
            RenderMode::StaticSite => out.text_element(
                Element::new("a")
                    .class("project-more")
                    .attr("href", page.filename.as_str()),
                "View project",
            ),
            RenderMode::SinglePage => out.text_element(
                Element::new("a")
                    .class("project-more")
                    .attr("href", format!("#{}", page.anchor())),
                "View project",
            ),
        }
    }

    out.close();
    out.close();
}

/// Full details for one project: shared by the live overlay, exported
/// project pages and the single-page detail list.
pub(crate) fn project_details<M: Markup>(
    out: &mut M,
    project: &Project,
    page: Option<&ProjectPage>,
    ctx: &RenderContext,
) {
    let mut article = Element::new("article").class("project-detail");
    if let (RenderMode::SinglePage, Some(page)) = (ctx.mode, page) {
        article = article.id(&page.anchor());
    }
    out.open(article);

    out.text_element(
        Element::new("h2").class("project-detail-title"),
        non_blank(&project.title).unwrap_or("Untitled project"),
    );
    if let Some(date) = non_blank(&project.date) {
        out.text_element(Element::new("p").class("timeline-dates"), date);
    }
    if let Some(description) = non_blank(&project.description) {
        out.text_element(Element::new("p").class("project-description"), description);
    }
    if let Some(details) = non_blank(&project.details) {
        for paragraph in details.lines().filter_map(non_blank) {
            out.text_element(Element::new("p"), paragraph);
        }
    }

    let features = project.features();
    if !features.is_empty() {
        out.text_element(Element::new("h3").class("subsection-title"), "Features");
        out.open(Element::new("ul"));
        for feature in features.iter() {
            out.text_element(Element::new("li"), feature);
        }
        out.close();
    }

    tech_list(out, project);

    let images = project.images();
    if !images.is_empty() {
        out.open(Element::new("div").class("project-gallery"));
        for (n, image) in images.iter().enumerate() {
            out.void(
                Element::new("img")
                    .attr("src", image)
                    .attr("alt", format!("{} {}", project.title.trim(), n + 1))
                    .attr("loading", "lazy"),
            );
        }
        out.close();
    }

    for url in project.video_embeds() {
        out.open(Element::new("div").class("project-video"));
        if is_direct_video(&url) {
            out.open(Element::new("video").attr("src", url.as_str()).attr("controls", "controls"));
            out.close();
        } else {
            out.open(
                Element::new("iframe")
                    .attr("src", url.as_str())
                    .attr("title", project.title.trim())
                    .attr("loading", "lazy")
                    .attr("allowfullscreen", "allowfullscreen"),
            );
            out.close();
        }
        out.close();
    }

    let demo = non_blank(&project.demo_url);
    let repo = non_blank(&project.repo_url);
    if demo.is_some() || repo.is_some() {
        out.open(Element::new("div").class("project-links"));
        if let Some(demo) = demo {
            external_link(out, demo, "Live demo");
        }
        if let Some(repo) = repo {
            external_link(out, repo, "Source code");
        }
        out.close();
    }

    if ctx.mode == RenderMode::SinglePage {
        out.text_element(
            Element::new("a").class("back-link").attr("href", "#projects"),
            "Back to projects",
        );
    }

    out.close();
}

fn skills<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    let columns = clamp_columns(section.columns(), SKILL_COLUMNS, SKILL_COLUMN_RANGE);

    open_section(out, "skills", section, "Skills");
    out.open(grid("skills-grid", columns));

    for skill in ctx.data.skills.iter().filter(|s| !s.name.trim().is_empty()) {
        out.open(Element::new("div").class("skill"));
        out.open(Element::new("div").class("skill-meta"));
        out.text_element(Element::new("span").class("skill-name"), skill.name.trim());
        let meta = [skill.level.trim(), skill.category.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");
        if !meta.is_empty() {
            out.text_element(Element::new("span"), &meta);
        }
        out.close();

        if let Some(percent) = skill.percent() {
            out.open(Element::new("div").class("skill-bar"));
            out.open(Element::new("span").attr("style", format!("width: {}%", percent)));
            out.close();
            out.close();
        }
        out.close();
    }

    out.close();
    out.close();
}

struct TimelineEntry<'a> {
    heading: &'a str,
    place: &'a str,
    location: &'a str,
    start: &'a str,
    end: &'a str,
    description: &'a str,
}

fn timeline<'a, M: Markup>(
    out: &mut M,
    entries: impl Iterator<Item = TimelineEntry<'a>>,
    current: &str,
) {
    out.open(Element::new("div").class("timeline"));
    for entry in entries {
        out.open(Element::new("div").class("timeline-item"));
        out.text_element(Element::new("h3"), entry.heading.trim());

        let meta = [entry.place.trim(), entry.location.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !meta.is_empty() {
            out.text_element(Element::new("p").class("timeline-meta"), &meta);
        }

        if let Some(start) = non_blank(entry.start) {
            let end = non_blank(entry.end).unwrap_or(current);
            out.text_element(
                Element::new("p").class("timeline-dates"),
                &format!("{} - {}", start, end),
            );
        }
        if let Some(description) = non_blank(entry.description) {
            out.text_element(Element::new("p"), description);
        }
        out.close();
    }
    out.close();
}

fn experience<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    let data = ctx.data;
    open_section(out, "experience", section, "Experience");

    if !data.experience.is_empty() {
        timeline(
            out,
            data.experience.iter().map(|e| TimelineEntry {
                heading: &e.position,
                place: &e.company,
                location: &e.location,
                start: &e.start_date,
                end: &e.end_date,
                description: &e.description,
            }),
            "Present",
        );
    }

    if !data.education.is_empty() {
        out.text_element(Element::new("h3").class("subsection-title"), "Education");
        timeline(
            out,
            data.education.iter().map(|e| TimelineEntry {
                heading: &e.degree,
                place: &e.institution,
                location: &e.location,
                start: &e.start_date,
                end: &e.end_date,
                description: &e.description,
            }),
            "Present",
        );
    }

    if !data.achievements.is_empty() {
        out.text_element(Element::new("h3").class("subsection-title"), "Achievements");
        out.open(Element::new("ul").class("timeline"));
        for achievement in &data.achievements {
            out.open(Element::new("li").class("timeline-item"));
            out.text_element(Element::new("strong"), achievement.title.trim());
            if let Some(date) = non_blank(&achievement.date) {
                out.text_element(Element::new("span").class("timeline-dates"), &format!(" ({})", date));
            }
            if let Some(description) = non_blank(&achievement.description) {
                out.text_element(Element::new("p"), description);
            }
            out.close();
        }
        out.close();
    }

    out.close();
}

fn contact_links(data: &PortfolioData) -> Vec<(&'static str, String, String)> {
    let personal = &data.personal;
    let mut links = Vec::new();
    if let Some(email) = non_blank(&personal.email) {
        links.push(("Email", email.to_string(), format!("mailto:{}", email)));
    }
    if let Some(phone) = non_blank(&personal.phone) {
        let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        links.push(("Phone", phone.to_string(), format!("tel:{}", digits)));
    }
    for (label, url) in [
        ("Website", &personal.website),
        ("LinkedIn", &personal.linkedin),
        ("GitHub", &personal.github),
    ] {
        if let Some(url) = non_blank(url) {
            links.push((label, url.to_string(), url.to_string()));
        }
    }
    links
}

fn contact<M: Markup>(out: &mut M, section: &Section, ctx: &RenderContext) {
    open_section(out, "contact", section, "Contact");

    let links = contact_links(ctx.data);
    if !links.is_empty() {
        out.open(Element::new("ul").class("contact-list"));
        for (label, text, href) in links {
            out.open(Element::new("li"));
            out.text_element(Element::new("strong"), label);
            out.text(" ");
            out.text_element(Element::new("a").attr("href", href), &text);
            out.close();
        }
        out.close();
    }

    if let Some(name) = non_blank(&ctx.data.personal.name) {
        out.text_element(Element::new("p").class("copyright"), &format!("© {}", name));
    }

    out.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{DomBuilder, HtmlWriter};
    use folio_core::{
        Education, EffectiveTemplate, LayoutArea, Skill, TemplateConfig, TemplateRegistry,
    };
    use pretty_assertions::assert_eq;

    fn template() -> EffectiveTemplate {
        EffectiveTemplate::from_config(&TemplateRegistry::new(), &TemplateConfig::default())
    }

    fn data() -> PortfolioData {
        let mut data = PortfolioData::default();
        data.personal.name = "Ada".into();
        data.projects = vec![
            Project {
                title: "Alpha".into(),
                technologies: "React, Node.js, ".into(),
                ..Default::default()
            },
            Project {
                title: "".into(),
                description: "Untitled but described".into(),
                ..Default::default()
            },
        ];
        data
    }

    fn render(section: &Section, ctx: &RenderContext) -> String {
        let mut out = HtmlWriter::new();
        render_section(&mut out, section, ctx);
        out.finish()
    }

    #[test]
    fn dispatch_resolves_aliases() {
        assert_eq!(SectionKind::from_id("Hero"), Some(SectionKind::Header));
        assert_eq!(SectionKind::from_id(" sobre-mi "), Some(SectionKind::About));
        assert_eq!(SectionKind::from_id("footer"), Some(SectionKind::Contact));
        assert_eq!(SectionKind::from_id("testimonials"), None);
    }

    #[test]
    fn unknown_sections_render_nothing() {
        let template = template();
        let data = data();
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);

        let section = Section::new("testimonials", "Testimonials", 0, LayoutArea::Main);

        assert_eq!(render(&section, &ctx), "");
    }

    #[test]
    fn clamps_columns() {
        assert_eq!(clamp_columns(Some(7), 3, 2..=4), 4);
        assert_eq!(clamp_columns(Some(1), 3, 2..=4), 2);
        assert_eq!(clamp_columns(None, 3, 2..=4), 3);
        assert_eq!(clamp_columns(Some(0), 2, 1..=4), 1);
    }

    #[test]
    fn project_grid_uses_clamped_columns() {
        let template = template();
        let data = data();
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);
        let section = Section::new("projects", "Projects", 0, LayoutArea::Main).with_columns(7);

        let html = render(&section, &ctx);

        assert!(html.contains("data-columns=\"4\""));
        assert!(html.contains("--grid-columns: 4"));
    }

    #[test]
    fn tech_list_skips_empty_entries() {
        let template = template();
        let data = data();
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);
        let section = Section::new("projects", "Projects", 0, LayoutArea::Main);

        let html = render(&section, &ctx);

        assert_eq!(html.matches("class=\"tech-tag\"").count(), 2);
        assert!(html.contains("<li class=\"tech-tag\">Node.js</li>"));
    }

    #[test]
    fn card_affordance_follows_mode() {
        let template = template();
        let data = data();
        let section = Section::new("projects", "Projects", 0, LayoutArea::Main);

        let live = render(&section, &RenderContext::new(&data, &template, RenderMode::Interactive));
        let site = render(&section, &RenderContext::new(&data, &template, RenderMode::StaticSite));
        let single = render(&section, &RenderContext::new(&data, &template, RenderMode::SinglePage));

        assert!(live.contains("data-action=\"open-project\" data-project=\"0\""));
        assert!(!live.contains("href=\"proyecto-"));
        assert!(site.contains("href=\"proyecto-alpha.html\""));
        assert!(!site.contains("data-action"));
        assert!(single.contains("href=\"#proyecto-alpha\""));
        assert!(!single.contains("data-action"));
        // The untitled card has no page, so only one link each.
        assert_eq!(site.matches("project-more").count(), 1);
        assert_eq!(live.matches("project-more").count(), 1);
    }

    #[test]
    fn live_cards_carry_click_actions() {
        let template = template();
        let data = data();
        let ctx = RenderContext::new(&data, &template, RenderMode::Interactive);
        let section = Section::new("projects", "Projects", 0, LayoutArea::Main);

        let mut builder = DomBuilder::new();
        render_section(&mut builder, &section, &ctx);
        let root = builder.finish().remove(0);

        let buttons = root.find_all(&|e| e.action.is_some());
        assert_eq!(buttons.len(), 1);
        assert_eq!(
            buttons[0].element().map(|e| e.action),
            Some(Some(Action::OpenProject { index: 0 }))
        );
    }

    #[test]
    fn skills_default_to_two_columns_with_bars() {
        let template = template();
        let mut data = data();
        data.skills = vec![
            Skill {
                name: "Rust".into(),
                level: "85%".into(),
                category: "Languages".into(),
            },
            Skill {
                name: " ".into(),
                ..Default::default()
            },
        ];
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);
        let section = Section::new("skills", "Skills", 0, LayoutArea::Main);

        let html = render(&section, &ctx);

        assert!(html.contains("data-columns=\"2\""));
        assert!(html.contains("width: 85%"));
        assert_eq!(html.matches("class=\"skill\"").count(), 1);
    }

    #[test]
    fn sections_without_data_are_skipped() {
        let template = template();
        let data = PortfolioData::default();
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);

        for id in ["about", "projects", "skills", "experience", "contact"] {
            let section = Section::new(id, id, 0, LayoutArea::Main);
            assert_eq!(render(&section, &ctx), "", "{} rendered without data", id);
        }
        let header = Section::new("header", "Header", 0, LayoutArea::Header);
        assert!(render(&header, &ctx).contains("site-header"));
    }

    #[test]
    fn experience_includes_education_block() {
        let template = template();
        let mut data = PortfolioData::default();
        data.education.push(Education {
            degree: "BSc Mathematics".into(),
            institution: "University of London".into(),
            start_date: "1835".into(),
            ..Default::default()
        });
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);
        let section = Section::new("experience", "Experience", 0, LayoutArea::Main);

        let html = render(&section, &ctx);

        assert!(html.contains("<h3 class=\"subsection-title\">Education</h3>"));
        assert!(html.contains("1835 - Present"));
    }

    #[test]
    fn section_title_comes_from_config() {
        let template = template();
        let mut data = PortfolioData::default();
        data.personal.summary = "Hello".into();
        let ctx = RenderContext::new(&data, &template, RenderMode::StaticSite);
        let mut section = Section::new("about", "", 0, LayoutArea::Main);
        section.config.title = Some("Who I am".into());

        let html = render(&section, &ctx);

        assert!(html.contains("<h2 class=\"section-title\">Who I am</h2>"));
    }
}
