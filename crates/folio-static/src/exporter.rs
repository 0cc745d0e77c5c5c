//! Static site exporter.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use folio_core::{generate_theme, EffectiveTemplate, PortfolioData};
use folio_render::{
    render_page, render_project_detail, render_project_sections, Element, HtmlWriter, Markup,
    RenderContext, RenderMode,
};

use crate::assets::AssetPipeline;
use crate::templates::{BoilerplateContext, DocumentContext, TemplateEngine};

/// Options for an export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Minify the generated rule text
    pub minify: bool,

    /// `lang` attribute of every document
    pub lang: String,

    /// Site title; defaults to the portfolio owner's name
    pub title: Option<String>,

    /// Produce one document instead of a page per project
    pub single_page: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            minify: false,
            lang: "en".to_string(),
            title: None,
            single_page: false,
        }
    }
}

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to render project page {filename}: {message}")]
    PageError { filename: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

impl From<minijinja::Error> for ExportError {
    fn from(e: minijinja::Error) -> Self {
        ExportError::TemplateError(e.to_string())
    }
}

/// Generated files keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteFiles(BTreeMap<String, String>);

impl SiteFiles {
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.0.insert(name.into(), content.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// Result of [`SiteExporter::try_export`], suitable for showing to a user.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<SiteFiles>,
}

/// Renders portfolios into static documents.
#[derive(Debug)]
pub struct SiteExporter {
    options: ExportOptions,
    templates: TemplateEngine,
}

impl SiteExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            templates: TemplateEngine::new(),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn site_title(&self, data: &PortfolioData) -> String {
        self.options
            .title
            .as_deref()
            .or(Some(data.personal.name.as_str()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Portfolio")
            .to_string()
    }

    fn document(
        &self,
        title: String,
        data: &PortfolioData,
        css: &str,
        body: String,
    ) -> Result<String, minijinja::Error> {
        let description = [data.personal.title.trim(), data.personal.summary.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string();

        self.templates.render_document(&DocumentContext {
            title,
            description,
            lang: self.options.lang.clone(),
            css: css.to_string(),
            body,
            ..Default::default()
        })
    }

    fn render_body(ctx: &RenderContext, f: impl FnOnce(&mut HtmlWriter, &RenderContext)) -> String {
        let mut out = HtmlWriter::new();
        out.open(
            Element::new("div")
                .class("folio-root")
                .attr("data-template", ctx.template.id.as_str()),
        );
        f(&mut out, ctx);
        out.close();
        out.finish()
    }

    /// Export the multi-page site: `index.html`, one `proyecto-<slug>.html`
    /// per titled project and the deployment boilerplate.
    pub fn export_site(
        &self,
        data: &PortfolioData,
        template: &EffectiveTemplate,
    ) -> Result<SiteFiles, ExportError> {
        let start = Instant::now();
        let theme = generate_theme(template);
        let css = AssetPipeline::stylesheet(&theme, self.options.minify);
        let site_title = self.site_title(data);
        let ctx = RenderContext::new(data, template, RenderMode::StaticSite);

        let mut files = SiteFiles::default();

        let body = Self::render_body(&ctx, |out, ctx| render_page(out, ctx));
        files.insert(
            "index.html",
            self.document(site_title.clone(), data, &css, body)?,
        );

        let pages: Vec<Result<(String, String), ExportError>> = ctx
            .pages()
            .par_iter()
            .map(|page| {
                let body = Self::render_body(&ctx, |out, ctx| {
                    render_project_detail(out, page.index, ctx);
                });
                let title = format!("{} - {}", data.projects[page.index].title.trim(), site_title);
                self.document(title, data, &css, body)
                    .map(|html| (page.filename.clone(), html))
                    .map_err(|e| ExportError::PageError {
                        filename: page.filename.clone(),
                        message: e.to_string(),
                    })
            })
            .collect();

        for page in pages {
            let (filename, html) = page?;
            files.insert(filename, html);
        }

        self.add_boilerplate(&mut files, &site_title, template)?;

        tracing::info!(
            "Exported {} files ({} project pages) in {}ms",
            files.len(),
            ctx.pages().len(),
            start.elapsed().as_millis()
        );
        Ok(files)
    }

    /// Export one self-contained document with every project's details
    /// inlined under `#proyecto-<slug>` anchors.
    pub fn export_single_page(
        &self,
        data: &PortfolioData,
        template: &EffectiveTemplate,
    ) -> Result<String, ExportError> {
        let theme = generate_theme(template);
        let css = AssetPipeline::stylesheet(&theme, self.options.minify);
        let ctx = RenderContext::new(data, template, RenderMode::SinglePage);

        let body = Self::render_body(&ctx, |out, ctx| {
            render_page(out, ctx);
            render_project_sections(out, ctx);
        });

        Ok(self.document(self.site_title(data), data, &css, body)?)
    }

    fn add_boilerplate(
        &self,
        files: &mut SiteFiles,
        site_title: &str,
        template: &EffectiveTemplate,
    ) -> Result<(), ExportError> {
        let context = BoilerplateContext {
            site_title: site_title.to_string(),
            template_name: template.name.clone(),
            pages: files
                .names()
                .filter(|n| n.ends_with(".html"))
                .map(str::to_string)
                .collect(),
        };

        for name in ["README.md", "deploy.sh", "deploy.ps1"] {
            files.insert(name, self.templates.render_boilerplate(name, &context)?);
        }
        for (name, content) in AssetPipeline::static_files() {
            files.insert(name, content);
        }
        Ok(())
    }

    /// Run the export selected by the options, converting failures into an
    /// unsuccessful outcome.
    pub fn try_export(&self, data: &PortfolioData, template: &EffectiveTemplate) -> ExportOutcome {
        let result = if self.options.single_page {
            self.export_single_page(data, template).map(|html| {
                let mut files = SiteFiles::default();
                files.insert("index.html", html);
                files
            })
        } else {
            self.export_site(data, template)
        };

        match result {
            Ok(files) => ExportOutcome {
                success: true,
                message: format!("Exported {} files", files.len()),
                files: Some(files),
            },
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                ExportOutcome {
                    success: false,
                    message: e.to_string(),
                    files: None,
                }
            }
        }
    }
}

/// Write a generated file map under `dir`, creating it if needed.
///
/// Returns the number of files written.
pub fn write_site(files: &SiteFiles, dir: &Path) -> Result<usize, ExportError> {
    fs::create_dir_all(dir)
        .map_err(|e| ExportError::WriteError(format!("{}: {}", dir.display(), e)))?;

    for (name, content) in files.iter() {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExportError::WriteError(e.to_string()))?;
        }
        fs::write(&path, content)
            .map_err(|e| ExportError::WriteError(format!("{}: {}", path.display(), e)))?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("deploy.sh");
        if files.contains("deploy.sh") {
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
                .map_err(|e| ExportError::WriteError(e.to_string()))?;
        }
    }

    tracing::info!("Wrote {} files to {}", files.len(), dir.display());
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{
        Customization, LayoutArea, Project, Section, TemplateConfig, TemplateRegistry,
    };
    use folio_render::LiveRenderer;
    use pretty_assertions::assert_eq;

    fn template() -> EffectiveTemplate {
        EffectiveTemplate::from_config(&TemplateRegistry::new(), &TemplateConfig::default())
    }

    fn project(title: &str) -> Project {
        Project {
            title: title.to_string(),
            description: format!("About {}", title.trim()),
            technologies: "React, Node.js, ".to_string(),
            ..Default::default()
        }
    }

    fn data() -> PortfolioData {
        let mut data = PortfolioData::default();
        data.personal.name = "Ada Lovelace".to_string();
        data.personal.email = "ada@example.com".to_string();
        data.projects = vec![project("Alpha"), project("Beta "), project("")];
        data
    }

    #[test]
    fn exports_expected_file_set() {
        let exporter = SiteExporter::new(ExportOptions::default());

        let files = exporter.export_site(&data(), &template()).unwrap();

        assert_eq!(
            files.names().collect::<Vec<_>>(),
            vec![
                ".editorconfig",
                ".gitattributes",
                ".nojekyll",
                "README.md",
                "deploy.ps1",
                "deploy.sh",
                "index.html",
                "proyecto-alpha.html",
                "proyecto-beta.html",
            ]
        );
    }

    #[test]
    fn index_links_project_pages() {
        let exporter = SiteExporter::new(ExportOptions::default());

        let files = exporter.export_site(&data(), &template()).unwrap();
        let index = files.get("index.html").unwrap();

        assert!(index.contains("href=\"proyecto-alpha.html\""));
        assert!(index.contains("href=\"proyecto-beta.html\""));
        assert!(!index.contains("data-action"));
        assert!(index.contains("<title>Ada Lovelace</title>"));
    }

    #[test]
    fn project_page_has_details_and_back_link() {
        let exporter = SiteExporter::new(ExportOptions::default());

        let files = exporter.export_site(&data(), &template()).unwrap();
        let page = files.get("proyecto-beta.html").unwrap();

        assert!(page.contains("<title>Beta - Ada Lovelace</title>"));
        assert!(page.contains("href=\"index.html\""));
        assert_eq!(page.matches("class=\"tech-tag\"").count(), 2);
    }

    #[test]
    fn exported_css_matches_live_variables() {
        let template = template();
        let exporter = SiteExporter::new(ExportOptions {
            minify: true,
            ..Default::default()
        });

        let data = data();
        let files = exporter.export_site(&data, &template).unwrap();
        let index = files.get("index.html").unwrap();
        let live = LiveRenderer::new(&data, &template);

        for (name, value) in live.theme().variables() {
            assert!(
                index.contains(&format!("{}: {};", name, value)),
                "missing {} in export",
                name
            );
        }
        let root = live.render(None);
        let style = root.element().and_then(|e| e.get_attr("style")).unwrap();
        assert_eq!(style, live.theme().inline_style());
    }

    #[test]
    fn gradient_header_background() {
        let registry = TemplateRegistry::new();
        let customization: Customization = serde_json::from_value(serde_json::json!({
            "colors": {
                "primary": "#111111",
                "gradient": { "from": "#ff0000", "to": "#0000ff" }
            }
        }))
        .unwrap();
        let config = TemplateConfig {
            template_id: "minimal".to_string(),
            customization,
        };
        let template = EffectiveTemplate::from_config(&registry, &config);

        let theme = generate_theme(&template);

        assert_eq!(
            theme.get("--header-bg"),
            Some("linear-gradient(135deg, #ff0000, #0000ff)")
        );
    }

    #[test]
    fn clamps_project_columns_in_export() {
        let mut template = template();
        template.sections =
            vec![Section::new("projects", "Projects", 0, LayoutArea::Main).with_columns(7)];
        template.structure = folio_core::group_by_area(&template.sections);
        let exporter = SiteExporter::new(ExportOptions::default());

        let files = exporter.export_site(&data(), &template).unwrap();

        assert!(files.get("index.html").unwrap().contains("--grid-columns: 4"));
    }

    #[test]
    fn single_page_uses_anchors() {
        let exporter = SiteExporter::new(ExportOptions::default());

        let html = exporter.export_single_page(&data(), &template()).unwrap();

        assert!(html.contains("href=\"#proyecto-alpha\""));
        assert!(html.contains("id=\"proyecto-alpha\""));
        assert!(html.contains("id=\"proyecto-beta\""));
        assert!(!html.contains("proyecto-alpha.html"));
    }

    #[test]
    fn custom_css_stays_inside_style_element() {
        let customization = Customization {
            custom_css: Some("h1 { color: red; }</style><script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let template = folio_core::resolve(
            TemplateRegistry::new().get("modern").unwrap(),
            &customization,
        );
        let exporter = SiteExporter::new(ExportOptions {
            minify: false,
            ..Default::default()
        });

        let files = exporter.export_site(&data(), &template).unwrap();
        let index = files.get("index.html").unwrap();

        assert_eq!(index.matches("</style>").count(), 1);
        assert!(index.contains("<\\/style><script>"));
        assert!(index.contains("<div class=\"folio-root\" data-template=\"modern\">"));
    }

    #[test]
    fn try_export_reports_success() {
        let exporter = SiteExporter::new(ExportOptions {
            single_page: true,
            ..Default::default()
        });

        let outcome = exporter.try_export(&data(), &template());

        assert!(outcome.success);
        assert_eq!(
            outcome.files.unwrap().names().collect::<Vec<_>>(),
            vec!["index.html"]
        );
    }

    #[test]
    fn writes_site_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = SiteExporter::new(ExportOptions::default());
        let files = exporter.export_site(&data(), &template()).unwrap();

        let written = write_site(&files, &dir.path().join("dist")).unwrap();

        assert_eq!(written, files.len());
        let index = std::fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert_eq!(index, files.get("index.html").unwrap());
        assert!(dir.path().join("dist/.nojekyll").exists());
    }
}
