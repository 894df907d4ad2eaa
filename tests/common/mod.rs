//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! #[cfg_attr(not(feature = "integration-tests"), ignore)]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config(configs::DEFAULTS);
//!     fixture.command().arg("validate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common `.pipeline-library.yaml` snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Every version left at its default.
    pub const DEFAULTS: &str = "{}\n";

    /// Overridden versions and a few declared plugins.
    pub const WITH_PLUGINS: &str = r#"
coreVersion: "2.89.1"
pipelineTestUnitVersion: "1.3"
workflow:
  cpsPluginVersion: "2.41"
dependencies:
  - cloudbees:
      name: cloudbees-folder
      version: "6.1.2"
  - blueocean:
      name: blueocean-pipeline-api-impl
      version: "1.3.0"
  - dependency: "org.example:custom-steps:0.9"
"#;

    /// Drops the pipeline unit helper from the test libraries.
    pub const WITHOUT_PIPELINE_UNIT: &str = "pipelineTestUnitVersion: null\n";

    /// Custom build directory and retriever identity.
    pub const CUSTOM_BUILD: &str = r#"
build:
  buildDir: out
  retrieverClass: WorkspaceRetriever
  retrieverPackage: org.example.testing
"#;

    /// Misspelled key.
    pub const UNKNOWN_KEY: &str = "coreVerison: \"2.89.1\"\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "coreVersion: [unclosed\n";
}

/// A temporary shared library project.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.pipeline-library.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".pipeline-library.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add the files of a small library, plus files that are not part of it.
    #[allow(dead_code)]
    pub fn with_library_sources(self) -> Self {
        self.with_file("src/org/example/Helper.groovy", "class Helper {}\n")
            .with_file("vars/deploy.groovy", "def call() {}\n")
            .with_file("vars/deploy.txt", "Deploys the service.\n")
            .with_file("resources/org/example/template.json", "{}\n")
            .with_file("test/unit/groovy/DeployTest.groovy", "class DeployTest {}\n")
            .with_file("README.md", "# Library\n")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".pipeline-library.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command that works on this fixture's project.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pipeline-lib-build");
        cmd.current_dir(self.path())
            .env_remove("PIPELINE_LIB_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
