//! Prompt command.

use anyhow::{Context, Result};
use clap::Args;
use narr_core::{StructureRegistry, StructureType};

#[derive(Args)]
pub struct PromptArgs {
    /// Structure slug, e.g. harmon_circle
    pub structure: String,
}

pub fn execute(args: PromptArgs) -> Result<()> {
    let structure_type: StructureType = args.structure.parse()?;
    let registry = StructureRegistry::with_builtins();
    let structure = registry
        .get(structure_type)
        .with_context(|| format!("Structure not registered: {}", structure_type))?;

    println!("{}", structure.prompt());
    Ok(())
}
