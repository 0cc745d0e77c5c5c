//! Template listing and selection.

use anyhow::Result;
use folio_core::EditorSession;

use crate::config::ConfigFile;

/// Print every available template, marking the selected one.
pub fn list(config: &ConfigFile) -> Result<()> {
    let session = EditorSession::restore(&config.store(), config.site.templates_dir.as_deref());
    let selected = &session.config().template_id;

    for template in session.registry().templates() {
        let marker = if &template.id == selected { "*" } else { " " };
        let origin = if template.is_custom { "custom" } else { "built-in" };
        println!(
            "{} {:<24} {:<24} {:<14} {}",
            marker,
            template.id,
            template.name,
            format!("{:?}", template.category).to_lowercase(),
            origin
        );
    }

    Ok(())
}

/// Select a template and save the configuration.
pub fn select(config: &ConfigFile, id: &str) -> Result<()> {
    let store = config.store();
    let mut session = EditorSession::restore(&store, config.site.templates_dir.as_deref());

    session.select_template(id)?;
    store.save_template_config(session.config())?;

    tracing::info!("Now using template '{}'", session.effective().name);
    Ok(())
}
