//! Live preview command.

use anyhow::Result;
use folio_server::PreviewServer;

use crate::config::ConfigFile;

/// Run the preview server.
pub async fn run(config: &ConfigFile, port: Option<u16>, open: bool) -> Result<()> {
    let mut preview = config.preview_config();
    if let Some(port) = port {
        preview.port = port;
    }
    preview.open &= open;

    tracing::info!(
        "Starting preview server on port {} (state in {})",
        preview.port,
        preview.state_dir.display()
    );

    PreviewServer::new(preview).start().await?;

    Ok(())
}
