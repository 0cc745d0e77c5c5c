//! Import a template configuration or a custom template.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_core::EditorSession;

use crate::config::ConfigFile;

/// Run the import command.
pub fn run(config: &ConfigFile, file: &Path, as_template: bool) -> Result<()> {
    let json =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let store = config.store();
    let mut session = EditorSession::restore(&store, config.site.templates_dir.as_deref());

    if as_template {
        if !session.import_template(&json) {
            anyhow::bail!("{} is not a valid template", file.display());
        }
        store.save_custom_templates(session.registry())?;
        tracing::info!("Imported template from {}", file.display());
    } else {
        if !session.import_config(&json) {
            anyhow::bail!("{} is not a valid template configuration", file.display());
        }
        store.save_template_config(session.config())?;
        tracing::info!(
            "Imported configuration for template '{}'",
            session.config().template_id
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    fn config(root: &Path) -> ConfigFile {
        ConfigFile {
            site: SiteConfig {
                state_dir: root.join("state"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn imports_configuration() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        let file = temp.path().join("config.json");
        fs::write(
            &file,
            r##"{"templateId": "creative", "customization": {"colors": {"primary": "#123456"}}}"##,
        )
        .unwrap();

        run(&config, &file, false).unwrap();

        let saved = config.store().load_template_config();
        assert_eq!(saved.template_id, "creative");
        assert_eq!(
            saved.customization.colors.and_then(|c| c.primary).as_deref(),
            Some("#123456")
        );
    }

    #[test]
    fn rejects_invalid_configuration() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        let file = temp.path().join("config.json");
        fs::write(&file, "[1, 2, 3]").unwrap();

        assert!(run(&config, &file, false).is_err());
        assert_eq!(config.store().load_template_config().template_id, "modern");
    }
}
