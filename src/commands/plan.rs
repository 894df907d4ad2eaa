//! # Plan Command Implementation
//!
//! Shows which stages run, and in what order, when the given stages are
//! requested. Prerequisites are pulled in automatically; ordering-only
//! constraints apply only between stages that are already part of the plan.

use std::str::FromStr;

use anyhow::Result;
use clap::Args;

use pipeline_lib_build::stages::Stage;

use super::ProjectContext;

/// Show the execution order of stages
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Stages to run (for example `unitTest integrationTest`).
    #[arg(required = true, value_name = "STAGE")]
    pub stages: Vec<String>,
}

/// Execute the `plan` command.
pub fn execute(args: PlanArgs, context: &ProjectContext) -> Result<()> {
    let requested = args
        .stages
        .iter()
        .map(|s| Stage::from_str(s))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let build = context.compose()?;
    let plan = build.stages().plan(&requested)?;

    for (index, stage) in plan.stages.iter().enumerate() {
        println!("{}. {}", index + 1, stage);
        for (key, value) in plan.environment_for(*stage) {
            println!("     {}={}", key, value);
        }
    }
    Ok(())
}
