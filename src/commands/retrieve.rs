//! # Retrieve Command Implementation
//!
//! Copies a shared library from a local directory into a job workspace,
//! keeping only the library's own files (`src/**/*.groovy`, `vars/*.groovy`,
//! `vars/*.txt` and `resources/**`). This is the same copy the generated
//! retriever performs inside the test harness.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline_lib_build::retrieval;

/// Copy a library from a local directory into a workspace
#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Root directory of the library to copy.
    #[arg(long, value_name = "DIR")]
    pub from: PathBuf,

    /// Workspace directory to copy into.
    #[arg(long, value_name = "DIR")]
    pub to: PathBuf,
}

/// Execute the `retrieve` command.
pub fn execute(args: RetrieveArgs) -> Result<()> {
    let report = retrieval::copy_library(&args.from, &args.to, &mut io::stdout())?;
    println!("Copied {} files", report.copied.len());
    Ok(())
}
