//! # Test Stage Orchestration
//!
//! Wires the build stages of a shared library project: compilation of each
//! source root, generation of the local library retriever, and the two test
//! stages.
//!
//! Two kinds of relationship exist between stages:
//!
//! - **Prerequisites** (`depends_on`) pull the target stage into the plan. The
//!   integration-test stage requires successful compilation of `main`.
//! - **Ordering constraints** (`must_run_after`) only apply when both stages
//!   are already in the plan. Requesting `integrationTest` never pulls in
//!   `unitTest`, but when both are requested, unit tests run first.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};

/// Environment variable through which the integration-test process finds the
/// build output directory.
pub const BUILD_DIR_ENV: &str = "PIPELINE_LIB_BUILD_DIR";

/// A named unit of work in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    #[serde(rename = "compileGroovy")]
    CompileMain,
    #[serde(rename = "compileUnitTestGroovy")]
    CompileUnitTest,
    #[serde(rename = "unitTest")]
    UnitTest,
    #[serde(rename = "generateLocalLibraryRetriever")]
    GenerateRetriever,
    #[serde(rename = "compileIntegrationTestGroovy")]
    CompileIntegrationTest,
    #[serde(rename = "integrationTest")]
    IntegrationTest,
}

impl Stage {
    /// Every stage, in declaration order.
    pub const ALL: [Stage; 6] = [
        Stage::CompileMain,
        Stage::CompileUnitTest,
        Stage::UnitTest,
        Stage::GenerateRetriever,
        Stage::CompileIntegrationTest,
        Stage::IntegrationTest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::CompileMain => "compileGroovy",
            Stage::CompileUnitTest => "compileUnitTestGroovy",
            Stage::UnitTest => "unitTest",
            Stage::GenerateRetriever => "generateLocalLibraryRetriever",
            Stage::CompileIntegrationTest => "compileIntegrationTestGroovy",
            Stage::IntegrationTest => "integrationTest",
        }
    }

    /// Whether the stage executes tests.
    pub fn is_test(self) -> bool {
        matches!(self, Stage::UnitTest | Stage::IntegrationTest)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| Error::Configuration {
                message: format!("unknown stage '{}'", s),
                hint: Some(format!(
                    "Known stages: {}",
                    Stage::ALL.map(Stage::name).join(", ")
                )),
            })
    }
}

/// Ordered stages selected for one invocation, plus their environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub stages: Vec<Stage>,
    pub environment: BTreeMap<Stage, BTreeMap<String, String>>,
}

impl ExecutionPlan {
    pub fn position(&self, stage: Stage) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage)
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Environment variables for a stage's process; empty for most stages.
    pub fn environment_for(&self, stage: Stage) -> BTreeMap<String, String> {
        self.environment.get(&stage).cloned().unwrap_or_default()
    }
}

/// Stage relationships of a shared library build.
#[derive(Debug, Clone)]
pub struct StageGraph {
    depends_on: BTreeMap<Stage, BTreeSet<Stage>>,
    must_run_after: BTreeMap<Stage, BTreeSet<Stage>>,
    build_dir: PathBuf,
}

impl StageGraph {
    /// Hard prerequisites of `stage`.
    pub fn prerequisites(&self, stage: Stage) -> Vec<Stage> {
        self.depends_on
            .get(&stage)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Stages `stage` must follow when they are in the same plan.
    pub fn ordered_after(&self, stage: Stage) -> Vec<Stage> {
        self.must_run_after
            .get(&stage)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Plan the execution of `requested` stages.
    ///
    /// Prerequisites are added transitively. The order respects both
    /// prerequisites and ordering constraints and, among stages that are free
    /// to run, follows declaration order so the plan is deterministic.
    pub fn plan(&self, requested: &[Stage]) -> Result<ExecutionPlan> {
        let mut selected = BTreeSet::new();
        let mut pending: Vec<Stage> = requested.to_vec();
        while let Some(stage) = pending.pop() {
            if selected.insert(stage) {
                pending.extend(self.prerequisites(stage));
            }
        }

        // Edges: stage -> stages that must come before it, restricted to the plan.
        let before = |stage: Stage| -> BTreeSet<Stage> {
            self.prerequisites(stage)
                .into_iter()
                .chain(self.ordered_after(stage))
                .filter(|s| selected.contains(s))
                .collect()
        };

        let mut remaining: BTreeSet<Stage> = selected.clone();
        let mut stages = Vec::with_capacity(selected.len());
        while !remaining.is_empty() {
            let next = remaining
                .iter()
                .copied()
                .find(|s| before(*s).iter().all(|b| !remaining.contains(b)))
                .ok_or_else(|| {
                    Error::configuration(format!(
                        "stage ordering cycle among: {}",
                        remaining
                            .iter()
                            .map(|s| s.name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
            remaining.remove(&next);
            stages.push(next);
        }

        let mut environment = BTreeMap::new();
        if selected.contains(&Stage::IntegrationTest) {
            environment.insert(Stage::IntegrationTest, self.integration_test_environment());
        }

        debug!(
            "Planned stages: {}",
            stages.iter().map(|s| s.name()).collect::<Vec<_>>().join(" -> ")
        );
        Ok(ExecutionPlan {
            stages,
            environment,
        })
    }

    /// Variables exported to the integration-test process.
    pub fn integration_test_environment(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert(
            BUILD_DIR_ENV.to_string(),
            self.build_dir.display().to_string(),
        );
        env
    }
}

/// Wires the stage relationships for a build directory.
#[derive(Debug, Clone)]
pub struct TestStageOrchestrator {
    build_dir: PathBuf,
}

impl TestStageOrchestrator {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn wire(&self) -> StageGraph {
        let mut depends_on: BTreeMap<Stage, BTreeSet<Stage>> = BTreeMap::new();
        let mut must_run_after: BTreeMap<Stage, BTreeSet<Stage>> = BTreeMap::new();
        let mut require = |stage: Stage, prerequisites: &[Stage]| {
            depends_on
                .entry(stage)
                .or_default()
                .extend(prerequisites.iter().copied());
        };

        require(Stage::CompileUnitTest, &[Stage::CompileMain]);
        require(Stage::UnitTest, &[Stage::CompileUnitTest]);
        require(
            Stage::CompileIntegrationTest,
            &[
                Stage::CompileMain,
                Stage::CompileUnitTest,
                Stage::GenerateRetriever,
            ],
        );
        require(
            Stage::IntegrationTest,
            &[Stage::CompileIntegrationTest, Stage::CompileMain],
        );

        must_run_after
            .entry(Stage::IntegrationTest)
            .or_default()
            .insert(Stage::UnitTest);

        StageGraph {
            depends_on,
            must_run_after,
            build_dir: self.build_dir.clone(),
        }
    }
}
