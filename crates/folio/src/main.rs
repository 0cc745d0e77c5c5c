//! folio CLI - portfolio site builder with live preview and static export.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site builder with live preview and static export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create folio.toml and a sample portfolio in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the live preview server
    Dev {
        /// Port to listen on (defaults to config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Export the portfolio as a static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Portfolio data file (JSON or YAML) to export instead of the saved data
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Produce a single HTML document
        #[arg(long)]
        single_page: bool,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve the exported site, building it if the directory is empty
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the build output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Export again before serving
        #[arg(long)]
        rebuild: bool,

        /// Don't open browser
        #[arg(long)]
        no_open: bool,
    },

    /// List available templates
    Templates,

    /// Select a template (resets the customization)
    Use {
        /// Template id
        id: String,
    },

    /// Import a template configuration or a custom template
    Import {
        /// JSON file to import
        file: PathBuf,

        /// Import the file as a custom template
        #[arg(short, long)]
        template: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => commands::init::run(&cli.config, yes).await,
        command => execute(command, ConfigFile::load(&cli.config)?).await,
    }
}

/// Run a command that needs the project configuration.
async fn execute(command: Commands, config: ConfigFile) -> Result<()> {
    match command {
        Commands::Init { .. } => {}
        Commands::Dev { port, no_open } => {
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Build {
            output,
            data,
            single_page,
            no_minify,
        } => {
            let options = commands::build::BuildOptions {
                output,
                data,
                single_page,
                minify: if no_minify { Some(false) } else { None },
            };
            commands::build::run(&config, options).await?;
        }
        Commands::Serve {
            port,
            dir,
            rebuild,
            no_open,
        } => {
            let options = commands::serve::ServeOptions {
                port,
                dir,
                rebuild,
                open: config.server.open && !no_open,
            };
            commands::serve::run(&config, options).await?;
        }
        Commands::Templates => {
            commands::templates::list(&config)?;
        }
        Commands::Use { id } => {
            commands::templates::select(&config, &id)?;
        }
        Commands::Import { file, template } => {
            commands::import::run(&config, &file, template)?;
        }
    }

    Ok(())
}
