//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `pipeline-lib-build` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Commands that work on a project receive a [`ProjectContext`] built from the
//! global `--project-dir` and `--config` flags.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::debug;

use pipeline_lib_build::config;
use pipeline_lib_build::defaults::CONFIG_FILE_NAME;
use pipeline_lib_build::project::{ComposedBuild, SharedLibraryProject};

pub mod completions;
pub mod download;
pub mod generate;
pub mod graph;
pub mod plan;
pub mod resolve;
pub mod retrieve;
pub mod validate;

/// Where the project lives and which configuration file describes it.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_dir: PathBuf,
    config: Option<PathBuf>,
}

impl ProjectContext {
    pub fn new(project_dir: PathBuf, config: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            config,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.project_dir.join(CONFIG_FILE_NAME))
    }

    /// A project in its declaration phase with the configuration applied.
    pub fn load_project(&self) -> Result<SharedLibraryProject> {
        let config_path = self.config_path();
        if !config_path.exists() {
            bail!(
                "Configuration file not found: {}\n  hint: create {} in the project directory or pass --config",
                config_path.display(),
                CONFIG_FILE_NAME
            );
        }

        debug!("Loading configuration from {}", config_path.display());
        let config = config::from_file(&config_path)?;
        let project_dir = std::path::absolute(&self.project_dir)
            .with_context(|| format!("Invalid project directory {}", self.project_dir.display()))?;
        let mut project = SharedLibraryProject::new(project_dir);
        config
            .apply_to(&mut project)
            .with_context(|| format!("Failed to apply {}", config_path.display()))?;
        Ok(project)
    }

    pub fn compose(&self) -> Result<ComposedBuild> {
        let mut project = self.load_project()?;
        Ok(project.compose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_defaults_to_project_dir() {
        let context = ProjectContext::new(PathBuf::from("/work/lib"), None);
        assert_eq!(
            context.config_path(),
            Path::new("/work/lib/.pipeline-library.yaml")
        );

        let explicit = ProjectContext::new(
            PathBuf::from("/work/lib"),
            Some(PathBuf::from("/etc/lib.yaml")),
        );
        assert_eq!(explicit.config_path(), Path::new("/etc/lib.yaml"));
    }

    #[test]
    fn test_missing_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let context = ProjectContext::new(temp.path().to_path_buf(), None);
        let err = context.load_project().unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_compose_from_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "coreVersion: \"2.89.1\"\n",
        )
        .unwrap();
        let context = ProjectContext::new(temp.path().to_path_buf(), None);
        let build = context.compose().unwrap();
        assert!(build
            .resolved()
            .core_libraries()
            .iter()
            .any(|c| c.version() == "2.89.1"));
    }
}
