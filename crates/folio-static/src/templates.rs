//! Document shells and deployment boilerplate.

use minijinja::{context, Environment};
use serde::Serialize;

/// Context for rendering an HTML document.
///
/// Exported pages and the live preview share this shell; the preview adds a
/// style id (so reloads can swap the rules) and its client script.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentContext {
    /// Document title
    pub title: String,
    /// Meta description
    pub description: String,
    /// `lang` attribute
    pub lang: String,
    /// `id` of the inlined `<style>` element
    pub style_id: Option<String>,
    /// Full inlined stylesheet
    pub css: String,
    /// Rendered body markup, including the `.folio-root` element
    pub body: String,
    /// Script URLs loaded at the end of the body
    pub scripts: Vec<String>,
}

/// Context for the README and deploy scripts.
#[derive(Debug, Clone, Serialize)]
pub struct BoilerplateContext {
    pub site_title: String,
    pub template_name: String,
    /// Every generated HTML page, sorted.
    pub pages: Vec<String>,
}

/// Template engine using minijinja.
///
/// Only `.html` templates are autoescaped; the README and scripts are
/// rendered verbatim.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in [
            ("document.html", DOCUMENT_TEMPLATE),
            ("README.md", README_TEMPLATE),
            ("deploy.sh", DEPLOY_SH_TEMPLATE),
            ("deploy.ps1", DEPLOY_PS1_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("Failed to add built-in template");
        }

        Self { env }
    }

    /// Render a complete HTML document.
    pub fn render_document(&self, context: &DocumentContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("document.html")?;

        tmpl.render(context! {
            title => &context.title,
            description => &context.description,
            lang => &context.lang,
            style_id => &context.style_id,
            css => &context.css,
            body => &context.body,
            scripts => &context.scripts,
        })
    }

    /// Render one of the boilerplate files (`README.md`, `deploy.sh`, `deploy.ps1`).
    pub fn render_boilerplate(
        &self,
        name: &str,
        context: &BoilerplateContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine").finish_non_exhaustive()
    }
}

const DOCUMENT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="generator" content="folio">
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<title>{{ title }}</title>
  <style{% if style_id %} id="{{ style_id }}"{% endif %}>
{{ css | safe }}
  </style>
</head>
<body>
{{ body | safe }}
{% for src in scripts %}  <script src="{{ src }}"></script>
{% endfor %}</body>
</html>
"##;

const README_TEMPLATE: &str = r##"# {{ site_title }}

Static portfolio generated by folio using the **{{ template_name }}** template.

## Files

{% for page in pages %}- `{{ page }}`
{% endfor %}
## Preview locally

Open `index.html` in a browser, or serve the directory:

```sh
python3 -m http.server 8000
```

## Deploy to GitHub Pages

Run `./deploy.sh` (macOS/Linux) or `./deploy.ps1` (Windows) from this
directory. The script commits the site to a `gh-pages` branch and pushes it
to the `origin` remote.
"##;

const DEPLOY_SH_TEMPLATE: &str = r##"#!/usr/bin/env sh
# Deploy "{{ site_title }}" to GitHub Pages.
set -e

BRANCH="${BRANCH:-gh-pages}"

if [ ! -d .git ]; then
  git init
  git checkout -b "$BRANCH"
fi

git add -A
git commit -m "Deploy {{ site_title }}" || echo "Nothing to commit"
git push -f origin "HEAD:$BRANCH"

echo "Deployed to branch $BRANCH"
"##;

const DEPLOY_PS1_TEMPLATE: &str = r##"# Deploy "{{ site_title }}" to GitHub Pages.
$ErrorActionPreference = "Stop"

$Branch = if ($env:BRANCH) { $env:BRANCH } else { "gh-pages" }

if (-not (Test-Path .git)) {
    git init
    git checkout -b $Branch
}

git add -A
git commit -m "Deploy {{ site_title }}"
git push -f origin "HEAD:$Branch"

Write-Host "Deployed to branch $Branch"
"##;
