//! Serve the exported site, building it first when needed.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::commands::build::{self, BuildOptions};
use crate::config::ConfigFile;

/// Options for the serve command.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub port: u16,
    /// Directory to serve; the build output when unset
    pub dir: Option<PathBuf>,
    /// Export again even if the directory already holds a site
    pub rebuild: bool,
    pub open: bool,
}

/// Make sure `dir` holds an exported site. Returns `true` if it was built.
pub async fn prepare(config: &ConfigFile, dir: &Path, rebuild: bool) -> Result<bool> {
    if !rebuild && dir.join("index.html").is_file() {
        return Ok(false);
    }

    tracing::info!("Exporting site to {}", dir.display());
    build::run(
        config,
        BuildOptions {
            output: Some(dir.to_path_buf()),
            ..Default::default()
        },
    )
    .await?;
    Ok(true)
}

/// Run the serve command.
pub async fn run(config: &ConfigFile, options: ServeOptions) -> Result<()> {
    let dir = options
        .dir
        .unwrap_or_else(|| config.build.output.clone());
    prepare(config, &dir, options.rebuild).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, options.port)
        .parse()
        .context("Invalid address")?;

    let app = Router::new().fallback_service(ServeDir::new(&dir));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    if options.open {
        if let Err(e) = open::that(format!("http://{}", addr)) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
