//! # Generate Command Implementation
//!
//! Writes the local library retriever source used by integration tests. The
//! file is only rewritten when its content changes, so running the command
//! twice leaves the file untouched and build tools see it as up to date.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline_lib_build::generator::{GenerationOutcome, LibraryRetrieverGenerator};

use super::ProjectContext;

/// Generate the local library retriever source
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Root directory for generated sources.
    ///
    /// Defaults to the `generatedSourcesDir` build setting, or
    /// `<buildDir>/generated-src/integrationTest`. A relative path is taken
    /// from the project directory.
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs, context: &ProjectContext) -> Result<()> {
    let build = context.compose()?;
    let mut descriptor = build.retriever().clone();
    if let Some(root) = args.output_root {
        descriptor.output_root = build.project_dir().join(root);
    }

    match LibraryRetrieverGenerator::new().generate(&descriptor)? {
        GenerationOutcome::Written(path) => println!("Generated {}", path.display()),
        GenerationOutcome::UpToDate(path) => println!("Up to date: {}", path.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_lib_build::defaults::CONFIG_FILE_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_relative_output_root_is_under_project_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "{}\n").unwrap();
        let context = ProjectContext::new(temp.path().to_path_buf(), None);

        let args = GenerateArgs {
            output_root: Some(PathBuf::from("gen")),
        };
        execute(args, &context).unwrap();

        assert!(temp
            .path()
            .join("gen/com/example/pipeline/codegen/LocalLibraryRetriever.java")
            .is_file());
    }
}
