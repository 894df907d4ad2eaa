//! # Resolve Command Implementation
//!
//! Prints the coordinates the project resolves to: declared and required
//! plugins, the core libraries, and the test libraries. With `--json` the same
//! three lists are written as one JSON object.

use anyhow::Result;
use clap::Args;

use pipeline_lib_build::coordinate::Coordinate;

use super::ProjectContext;

/// Print resolved coordinates
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Output JSON instead of plain text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, context: &ProjectContext) -> Result<()> {
    let build = context.compose()?;
    let resolved = build.resolved();

    if args.json {
        println!("{}", serde_json::to_string_pretty(resolved)?);
        return Ok(());
    }

    print_section("Plugins", resolved.plugins());
    print_section("Core libraries", resolved.core_libraries());
    print_section("Test libraries", resolved.test_libraries());
    Ok(())
}

fn print_section(title: &str, coordinates: &[Coordinate]) {
    println!("{} ({}):", title, coordinates.len());
    for coordinate in coordinates {
        println!("  {}", coordinate);
    }
}
