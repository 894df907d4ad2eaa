//! Source root layout of a shared library project
//!
//! A shared library project has three source roots. Their directories are a
//! fixed convention relative to the project directory:
//!
//! | Root              | Script sources                     | Resources                     | Plain sources                 |
//! |-------------------|------------------------------------|-------------------------------|-------------------------------|
//! | `main`            | `src`, `vars`                      | `resources`                   | none                          |
//! | `unitTest`        | `test/unit/groovy`                 | `test/unit/resources`         | `test/unit/java`              |
//! | `integrationTest` | `test/integration/groovy`          | `test/integration/resources`  | `test/integration/java`       |

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Identifies one of the three source roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceRootName {
    Main,
    UnitTest,
    IntegrationTest,
}

impl SourceRootName {
    pub const ALL: [SourceRootName; 3] = [
        SourceRootName::Main,
        SourceRootName::UnitTest,
        SourceRootName::IntegrationTest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceRootName::Main => "main",
            SourceRootName::UnitTest => "unitTest",
            SourceRootName::IntegrationTest => "integrationTest",
        }
    }

    /// Prefix used to name tasks and classpath nodes of this root.
    ///
    /// The main root uses bare names (`compile`, `compileGroovy`), the others
    /// prefix their own name (`unitTestCompile`, `compileUnitTestGroovy`).
    pub fn node_prefix(self) -> &'static str {
        match self {
            SourceRootName::Main => "",
            SourceRootName::UnitTest => "unitTest",
            SourceRootName::IntegrationTest => "integrationTest",
        }
    }
}

impl fmt::Display for SourceRootName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directory mapping of one source root, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRoot {
    pub name: SourceRootName,
    pub script_dirs: Vec<PathBuf>,
    pub resource_dirs: Vec<PathBuf>,
    pub source_dirs: Vec<PathBuf>,
}

impl SourceRoot {
    /// All directories of this root resolved against `project_dir`.
    pub fn resolve_dirs(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.script_dirs
            .iter()
            .chain(&self.resource_dirs)
            .chain(&self.source_dirs)
            .map(|d| project_dir.join(d))
            .collect()
    }
}

/// Produces the three conventional source roots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectLayoutComposer;

impl ProjectLayoutComposer {
    pub fn new() -> Self {
        Self
    }

    /// The `main`, `unitTest` and `integrationTest` roots, in that order.
    pub fn compose(&self) -> Vec<SourceRoot> {
        vec![
            SourceRoot {
                name: SourceRootName::Main,
                script_dirs: vec![PathBuf::from("src"), PathBuf::from("vars")],
                resource_dirs: vec![PathBuf::from("resources")],
                source_dirs: vec![],
            },
            test_root(SourceRootName::UnitTest, "unit"),
            test_root(SourceRootName::IntegrationTest, "integration"),
        ]
    }
}

fn test_root(name: SourceRootName, dir: &str) -> SourceRoot {
    let base = Path::new("test").join(dir);
    SourceRoot {
        name,
        script_dirs: vec![base.join("groovy")],
        resource_dirs: vec![base.join("resources")],
        source_dirs: vec![base.join("java")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_returns_three_roots_in_order() {
        let roots = ProjectLayoutComposer::new().compose();
        let names: Vec<_> = roots.iter().map(|r| r.name).collect();
        assert_eq!(names, SourceRootName::ALL.to_vec());
    }

    #[test]
    fn test_main_root_uses_src_and_vars() {
        let roots = ProjectLayoutComposer::new().compose();
        assert_eq!(
            roots[0].script_dirs,
            vec![PathBuf::from("src"), PathBuf::from("vars")]
        );
        assert_eq!(roots[0].resource_dirs, vec![PathBuf::from("resources")]);
        assert!(roots[0].source_dirs.is_empty());
    }

    #[test]
    fn test_test_roots_live_under_test_tree() {
        let roots = ProjectLayoutComposer::new().compose();
        assert_eq!(
            roots[1].script_dirs,
            vec![Path::new("test").join("unit").join("groovy")]
        );
        assert_eq!(
            roots[2].source_dirs,
            vec![Path::new("test").join("integration").join("java")]
        );
    }

    #[test]
    fn test_compose_is_pure() {
        let composer = ProjectLayoutComposer::new();
        assert_eq!(composer.compose(), composer.compose());
    }

    #[test]
    fn test_resolve_dirs_joins_project_dir() {
        let roots = ProjectLayoutComposer::new().compose();
        let dirs = roots[0].resolve_dirs(Path::new("/work/lib"));
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/work/lib/src"),
                PathBuf::from("/work/lib/vars"),
                PathBuf::from("/work/lib/resources"),
            ]
        );
    }
}
