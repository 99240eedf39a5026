//! Structure listing command.

use anyhow::Result;
use narr_core::StructureRegistry;

use crate::output;

pub fn execute() -> Result<()> {
    let registry = StructureRegistry::with_builtins();
    output::print_structures_table(&registry.list());
    Ok(())
}
