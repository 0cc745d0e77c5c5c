//! Initialize a portfolio project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{
    Achievement, EditorSession, Experience, PersonalInfo, PortfolioData, Project, Skill,
};

use crate::config::ConfigFile;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    } else {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
    }

    let config = ConfigFile::load(config_path)?;
    let state_dir = &config.site.state_dir;
    fs::create_dir_all(state_dir)
        .with_context(|| format!("Failed to create {}", state_dir.display()))?;

    if let Some(templates_dir) = &config.site.templates_dir {
        fs::create_dir_all(templates_dir)
            .with_context(|| format!("Failed to create {}", templates_dir.display()))?;
    }

    let store = config.store();
    let session = EditorSession::restore(&store, None);
    if session.data() == &PortfolioData::default() || yes {
        store
            .save_portfolio(&sample_portfolio())
            .context("Failed to save sample portfolio")?;
        store
            .save_template_config(session.config())
            .context("Failed to save template configuration")?;
        tracing::info!("Created sample portfolio in {}", state_dir.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the live preview.");

    Ok(())
}

fn sample_portfolio() -> PortfolioData {
    PortfolioData {
        personal: PersonalInfo {
            name: "Alex Rivera".to_string(),
            title: "Full-stack Developer".to_string(),
            email: "alex@example.com".to_string(),
            location: "Remote".to_string(),
            github: "https://github.com/example".to_string(),
            summary: "I build fast, accessible web applications and the tools behind them."
                .to_string(),
            ..Default::default()
        },
        projects: vec![
            Project {
                title: "Task Tracker".to_string(),
                description: "A collaborative kanban board with offline support.".to_string(),
                details: "Syncs through a CRDT layer so edits merge without conflicts."
                    .to_string(),
                technologies: "TypeScript, React, IndexedDB".to_string(),
                features: "Offline mode, Drag and drop, Shared boards".to_string(),
                repo_url: "https://github.com/example/task-tracker".to_string(),
                date: "2024".to_string(),
                ..Default::default()
            },
            Project {
                title: "Weather CLI".to_string(),
                description: "Terminal forecasts with sparkline charts.".to_string(),
                technologies: "Rust, Tokio".to_string(),
                date: "2023".to_string(),
                ..Default::default()
            },
        ],
        skills: vec![
            Skill {
                name: "TypeScript".to_string(),
                level: "90".to_string(),
                category: "Languages".to_string(),
            },
            Skill {
                name: "Rust".to_string(),
                level: "75".to_string(),
                category: "Languages".to_string(),
            },
        ],
        experience: vec![Experience {
            position: "Software Engineer".to_string(),
            company: "Example Corp".to_string(),
            start_date: "2021".to_string(),
            description: "Led the migration of the billing frontend.".to_string(),
            ..Default::default()
        }],
        achievements: vec![Achievement {
            title: "Hackathon winner".to_string(),
            date: "2022".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}

const DEFAULT_CONFIG: &str = r#"# folio configuration

[site]
# Site title (defaults to your name)
# title = "My Portfolio"
lang = "en"

# Where the editor session is saved
state_dir = ".folio"

# Extra template JSON files
templates_dir = "templates"

# Images and videos served by the preview server at /assets
# assets_dir = "assets"

[build]
# Output directory for the exported site
output = "dist"

# Minify generated CSS
minify = true

# Export one HTML document instead of a page per project
single_page = false

[server]
port = 7777
host = "127.0.0.1"
open = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_parses() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.site.templates_dir.as_deref(), Some(Path::new("templates")));
        assert_eq!(config.server.port, 7777);
    }

    #[tokio::test]
    async fn init_writes_config_and_sample() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("folio.toml");
        let state_dir = temp.path().join("state");
        fs::write(
            &config_path,
            format!("[site]\nstate_dir = {:?}\n", state_dir.display().to_string()),
        )
        .unwrap();

        run(&config_path, false).await.unwrap();

        let config = ConfigFile::load(&config_path).unwrap();
        assert_eq!(config.site.state_dir, state_dir);
        let data = config.store().load_portfolio();
        assert_eq!(data.personal.name, "Alex Rivera");
        assert_eq!(data.projects.len(), 2);
    }
}
