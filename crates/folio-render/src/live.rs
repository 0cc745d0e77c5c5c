//! Live preview tree.

use folio_core::{generate_theme, EffectiveTemplate, PortfolioData, Theme};

use crate::markup::{Action, DomBuilder, Element, Markup, Node};
use crate::page::{render_page, RenderContext, RenderMode};
use crate::sections;

/// Renders the interactive preview of a portfolio.
///
/// The root element carries the theme variables as an inline style, so the
/// preview and the exported `:root` block come from the same map.
#[derive(Debug)]
pub struct LiveRenderer<'a> {
    ctx: RenderContext<'a>,
    theme: Theme,
}

impl<'a> LiveRenderer<'a> {
    pub fn new(data: &'a PortfolioData, template: &'a EffectiveTemplate) -> Self {
        Self {
            ctx: RenderContext::new(data, template, RenderMode::Interactive),
            theme: generate_theme(template),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Build the preview tree, with the details overlay for `selected` open.
    pub fn render(&self, selected: Option<usize>) -> Node {
        let mut dom = DomBuilder::new();
        dom.open(
            Element::new("div")
                .class("folio-root")
                .attr("data-template", self.ctx.template.id.as_str())
                .attr("style", self.theme.inline_style()),
        );
        render_page(&mut dom, &self.ctx);
        if let Some(index) = selected {
            self.overlay(&mut dom, index);
        }
        dom.close();

        dom.finish()
            .into_iter()
            .next()
            .unwrap_or(Node::Text { text: String::new() })
    }

    fn overlay<M: Markup>(&self, out: &mut M, index: usize) -> bool {
        let Some(project) = self.ctx.data.projects.get(index) else {
            tracing::debug!("Ignoring overlay for missing project {}", index);
            return false;
        };

        out.open(
            Element::new("div")
                .class("project-overlay")
                .attr("role", "dialog")
                .attr("aria-modal", "true"),
        );
        out.open(
            Element::new("div")
                .class("overlay-backdrop")
                .on_click(Action::CloseOverlay),
        );
        out.close();
        out.open(Element::new("div").class("overlay-panel"));
        out.text_element(
            Element::new("button")
                .class("overlay-close")
                .attr("type", "button")
                .attr("aria-label", "Close")
                .on_click(Action::CloseOverlay),
            "×",
        );
        sections::project_details(out, project, self.ctx.page_for(index), &self.ctx);
        out.close();
        out.close();
        true
    }

    /// The preview tree serialized as HTML.
    pub fn to_html(&self, selected: Option<usize>) -> String {
        self.render(selected).to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Project, TemplateConfig, TemplateRegistry};
    use pretty_assertions::assert_eq;

    fn fixture() -> (PortfolioData, EffectiveTemplate) {
        let mut data = PortfolioData::default();
        data.personal.name = "Grace".into();
        data.projects.push(Project {
            title: "Compiler".into(),
            videos: "https://youtu.be/abc123".into(),
            ..Default::default()
        });
        let template =
            EffectiveTemplate::from_config(&TemplateRegistry::new(), &TemplateConfig::default());
        (data, template)
    }

    #[test]
    fn root_carries_theme_variables() {
        let (data, template) = fixture();
        let renderer = LiveRenderer::new(&data, &template);

        let root = renderer.render(None);

        let style = root.element().and_then(|e| e.get_attr("style")).unwrap();
        assert_eq!(style, renderer.theme().inline_style());
        assert!(style.contains("--color-primary"));
        assert!(root.find_by_class("project-overlay").is_empty());
    }

    #[test]
    fn selected_project_opens_overlay() {
        let (data, template) = fixture();
        let renderer = LiveRenderer::new(&data, &template);

        let root = renderer.render(Some(0));

        let overlay = root.find_by_class("project-overlay");
        assert_eq!(overlay.len(), 1);
        assert!(overlay[0].text_content().contains("Compiler"));
        let html = overlay[0].to_html();
        assert!(html.contains("https://www.youtube.com/embed/abc123"));
        assert!(html.contains("data-action=\"close-overlay\""));
    }

    #[test]
    fn missing_selection_is_ignored() {
        let (data, template) = fixture();
        let renderer = LiveRenderer::new(&data, &template);

        assert!(renderer.render(Some(5)).find_by_class("project-overlay").is_empty());
    }
}
