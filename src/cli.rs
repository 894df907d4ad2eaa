//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Pipeline Library Build - Compile a Jenkins shared library project into a build graph
#[derive(Parser, Debug)]
#[command(name = "pipeline-lib-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Directory of the shared library project
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,

    /// Configuration file (defaults to .pipeline-library.yaml in the project directory)
    #[arg(long, global = true, value_name = "FILE", env = "PIPELINE_LIB_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the configuration file and compose the build without writing anything
    Validate(commands::validate::ValidateArgs),

    /// Print the resolved plugin, core and test coordinates
    Resolve(commands::resolve::ResolveArgs),

    /// Show the classpath graph
    Graph(commands::graph::GraphArgs),

    /// Show the execution order of the requested stages
    Plan(commands::plan::PlanArgs),

    /// Generate the local library retriever source
    Generate(commands::generate::GenerateArgs),

    /// Copy a shared library from a local directory into a workspace
    Retrieve(commands::retrieve::RetrieveArgs),

    /// Download a file into the local download cache
    Download(commands::download::DownloadArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = commands::ProjectContext::new(self.project_dir, self.config);
        match self.command {
            Commands::Validate(args) => commands::validate::execute(args, &context),
            Commands::Resolve(args) => commands::resolve::execute(args, &context),
            Commands::Graph(args) => commands::graph::execute(args, &context),
            Commands::Plan(args) => commands::plan::execute(args, &context),
            Commands::Generate(args) => commands::generate::execute(args, &context),
            Commands::Retrieve(args) => commands::retrieve::execute(args),
            Commands::Download(args) => commands::download::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when it is set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
