//! Static export command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_core::{EditorSession, PortfolioData};
use folio_static::{write_site, SiteExporter, SiteFiles};

use crate::config::ConfigFile;

/// Command-line overrides for a build.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub output: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub single_page: bool,
    pub minify: Option<bool>,
}

/// Read portfolio data from a JSON or YAML file, by extension.
pub fn load_data_file(path: &Path) -> Result<PortfolioData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let data = if ext == "yaml" || ext == "yml" {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    };
    Ok(data)
}

/// Run the build command.
pub async fn run(config: &ConfigFile, options: BuildOptions) -> Result<()> {
    tracing::info!("Exporting portfolio...");

    let mut session = EditorSession::restore(&config.store(), config.site.templates_dir.as_deref());

    if let Some(path) = options.data.as_ref().or(config.site.data.as_ref()) {
        session.replace_portfolio(load_data_file(path)?);
        tracing::info!("Using portfolio data from {}", path.display());
    }

    let data = session.data();
    if data.personal.name.trim().is_empty() && data.projects.is_empty() {
        tracing::warn!("Portfolio is empty; run 'folio init' or pass --data");
    }

    let mut export = config.export_options();
    export.minify = options.minify.unwrap_or(export.minify);
    export.single_page |= options.single_page;

    let output = options
        .output
        .unwrap_or_else(|| config.build.output.clone());
    let exporter = SiteExporter::new(export);

    let files = if exporter.options().single_page {
        let mut files = SiteFiles::default();
        files.insert("index.html", exporter.export_single_page(data, session.effective())?);
        files
    } else {
        exporter.export_site(data, session.effective())?
    };

    let written = write_site(&files, &output)?;

    tracing::info!(
        "Exported '{}' with template '{}': {} files",
        data.personal.name.trim(),
        session.effective().id,
        written
    );
    tracing::info!("Output: {}", output.display());

    Ok(())
}
