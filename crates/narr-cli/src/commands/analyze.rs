//! Offline analysis command.

use anyhow::{Context, Result};
use clap::Args;
use narr_core::input::{self, UploadedFile};
use narr_core::{Analyzer, Settings};
use std::io::Read;
use std::path::PathBuf;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Story file to analyze (`-` reads standard input)
    pub file: PathBuf,

    /// Structure slug (default: auto-detect)
    #[arg(short, long)]
    pub structure: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: AnalyzeArgs, settings: &Settings) -> Result<()> {
    let structure = input::parse_structure_choice(args.structure.as_deref())?;

    let extracted = if args.file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        input::extract_text(Some(&text), None, &settings.limits)?
    } else {
        let bytes = std::fs::read(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        let upload = UploadedFile {
            name: args.file.to_string_lossy().into_owned(),
            bytes,
        };
        input::extract_text(None, Some(&upload), &settings.limits)?
    };

    let analyzer = Analyzer::default();
    let result = analyzer.analyze(&extracted.text, structure)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_analysis(&result);
    }

    Ok(())
}
