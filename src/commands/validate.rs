//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks the
//! `.pipeline-library.yaml` configuration of a project without writing
//! anything.
//!
//! ## Functionality
//!
//! - **Configuration Validation**: parses the configuration file, rejecting
//!   unknown keys and malformed coordinates.
//! - **Composition**: runs the full compose step (catalog freeze, resolution,
//!   classpath graph, stage wiring) and reports a summary.
//! - **Generation Check**: validates the local library retriever descriptor
//!   so bad class or package names surface before a build runs.

use anyhow::Result;
use clap::Args;

use pipeline_lib_build::generator;

use super::ProjectContext;

/// Validate the project configuration
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also list every catalog version, not only the summary.
    #[arg(long)]
    pub verbose: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, context: &ProjectContext) -> Result<()> {
    let config_path = context.config_path();
    println!("Validating configuration: {}", config_path.display());

    let build = context.compose()?;
    let descriptor = build.retriever();
    generator::validate(descriptor, &descriptor.output_path())?;
    let rendered = generator::render(descriptor);

    println!("Configuration is valid");
    println!("   Declared and required plugins: {}", build.resolved().plugins().len());
    println!("   Core libraries: {}", build.resolved().core_libraries().len());
    println!("   Test libraries: {}", build.resolved().test_libraries().len());
    println!("   Classpath nodes: {}", build.graph().len());
    println!(
        "   Retriever: {} ({} lines)",
        descriptor.output_path().display(),
        rendered.lines().count()
    );

    if args.verbose {
        println!("\nCatalog:");
        for (key, version) in build.snapshot().entries() {
            println!("   {} = {}", key, version.unwrap_or("(unset)"));
        }
    }

    Ok(())
}
