//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use narr_core::Settings;
use std::path::{Path, PathBuf};

pub mod analyze;
pub mod prompt;
pub mod serve;
pub mod structures;

const CONFIG_FILE_NAME: &str = "narr.toml";

/// Narrative Structure Analyzer
#[derive(Parser)]
#[command(name = "narr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to ./narr.toml, then the user config dir)
    #[arg(short, long, global = true, env = "NARR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(serve::ServeArgs),

    /// Analyze a story file from the terminal
    Analyze(analyze::AnalyzeArgs),

    /// List available narrative structures
    Structures,

    /// Print the analysis prompt of a structure
    Prompt(prompt::PromptArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let settings = load_settings(self.config.as_deref())?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, settings).await,
            Commands::Analyze(args) => analyze::execute(args, &settings),
            Commands::Structures => structures::execute(),
            Commands::Prompt(args) => prompt::execute(args),
        }
    }
}

/// Resolve and load the settings file.
///
/// An explicit path must exist; the implicit locations are optional.
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Settings::load(path).with_context(|| format!("Failed to load {}", path.display()));
    }

    let candidates = [
        Some(PathBuf::from(CONFIG_FILE_NAME)),
        dirs::config_dir().map(|d| d.join("narr").join(CONFIG_FILE_NAME)),
    ];
    for path in candidates.into_iter().flatten() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config");
            return Settings::load(&path).with_context(|| format!("Failed to load {}", path.display()));
        }
    }

    Ok(Settings::default())
}
