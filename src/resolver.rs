//! # Dependency Set Resolution
//!
//! Turns the frozen version catalog and the user's extra plugin declarations
//! into the final, ordered coordinate lists that populate the hidden
//! classpath nodes.
//!
//! ## Ordering
//!
//! The plugin list is the user's declarations in declaration order, followed
//! by the eleven fixed plugin coordinates in their declared order. The two
//! parts are concatenated without merging: a user declaration of a fixed
//! plugin yields two coordinates for the same module.

use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog::{Component, VersionCatalog};
use crate::coordinate::Coordinate;
use crate::dependencies::{PluginDependencySpec, JENKINS_CI_GROUP, WORKFLOW_GROUP};
use crate::error::{Error, Result};

/// Git plugin version; it has no catalog slot.
pub const GIT_PLUGIN_VERSION: &str = "3.3.0";

const GROOVY_GROUP: &str = "org.codehaus.groovy";
const JENKINS_MAIN_GROUP: &str = "org.jenkins-ci.main";
const PIPELINE_UNIT_GROUP: &str = "com.lesfurets";

/// Artifact name for each workflow plugin slot.
fn workflow_artifact(component: Component) -> Option<&'static str> {
    let name = match component {
        Component::WorkflowApi => "workflow-api",
        Component::WorkflowBasicSteps => "workflow-basic-steps",
        Component::WorkflowCps => "workflow-cps",
        Component::WorkflowDurableTaskStep => "workflow-durable-task-step",
        Component::WorkflowGlobalLib => "workflow-cps-global-lib",
        Component::WorkflowJob => "workflow-job",
        Component::WorkflowMultibranch => "workflow-multibranch",
        Component::WorkflowScmStep => "workflow-scm-step",
        Component::WorkflowStepApi => "workflow-step-api",
        Component::WorkflowSupport => "workflow-support",
        _ => return None,
    };
    Some(name)
}

/// Immutable result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependencies {
    plugins: Vec<Coordinate>,
    core_libraries: Vec<Coordinate>,
    test_libraries: Vec<Coordinate>,
}

impl ResolvedDependencies {
    /// User declarations followed by the eleven required plugins.
    pub fn plugins(&self) -> &[Coordinate] {
        &self.plugins
    }

    /// Groovy runtime and host core.
    pub fn core_libraries(&self) -> &[Coordinate] {
        &self.core_libraries
    }

    /// Test harness and, when configured, the pipeline unit helper.
    pub fn test_libraries(&self) -> &[Coordinate] {
        &self.test_libraries
    }

    /// Every coordinate, plugins first.
    pub fn all(&self) -> impl Iterator<Item = &Coordinate> {
        self.plugins
            .iter()
            .chain(&self.core_libraries)
            .chain(&self.test_libraries)
    }
}

/// Runs resolution exactly once per build graph.
#[derive(Debug, Default)]
pub struct DependencySetResolver {
    resolved: bool,
}

impl DependencySetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve against a frozen catalog.
    ///
    /// Fails if the catalog has not been frozen yet or if this resolver has
    /// already produced a result.
    pub fn resolve(
        &mut self,
        catalog: &VersionCatalog,
        spec: &PluginDependencySpec,
    ) -> Result<ResolvedDependencies> {
        if self.resolved {
            return Err(Error::configuration(
                "dependency set has already been resolved for this build graph",
            ));
        }
        let snapshot = catalog.snapshot().ok_or_else(|| Error::Configuration {
            message: "dependency set resolved before the version catalog was frozen".to_string(),
            hint: Some("Call freeze() on the catalog before resolving".to_string()),
        })?;

        let mut plugins: Vec<Coordinate> = spec.dependencies().to_vec();
        let declared = plugins.len();
        for component in Component::WORKFLOW_PLUGINS {
            // Every workflow slot maps to an artifact name.
            let Some(artifact) = workflow_artifact(component) else {
                continue;
            };
            let version = snapshot.require(component)?;
            plugins.push(Coordinate::new(WORKFLOW_GROUP, artifact, version)?);
        }
        plugins.push(Coordinate::new(JENKINS_CI_GROUP, "git", GIT_PLUGIN_VERSION)?);

        for fixed in &plugins[declared..] {
            if let Some(user) = plugins[..declared]
                .iter()
                .find(|c| c.module_id() == fixed.module_id())
            {
                warn!(
                    "{} is declared explicitly and is also required as {}; both are kept",
                    user, fixed
                );
            }
        }

        let core_libraries = vec![
            Coordinate::new(GROOVY_GROUP, "groovy-all", snapshot.require(Component::Groovy)?)?,
            Coordinate::new(
                JENKINS_MAIN_GROUP,
                "jenkins-core",
                snapshot.require(Component::Core)?,
            )?,
        ];

        let mut test_libraries = vec![Coordinate::new(
            JENKINS_MAIN_GROUP,
            "jenkins-test-harness",
            snapshot.require(Component::TestHarness)?,
        )?];
        if let Some(version) = snapshot.get(Component::PipelineTestUnit) {
            test_libraries.push(Coordinate::new(
                PIPELINE_UNIT_GROUP,
                "jenkins-pipeline-unit",
                version,
            )?);
        } else {
            debug!("Pipeline unit helper not configured, skipping");
        }

        self.resolved = true;
        info!(
            "Resolved {} plugin coordinates ({} declared), {} core and {} test libraries",
            plugins.len(),
            declared,
            core_libraries.len(),
            test_libraries.len()
        );

        Ok(ResolvedDependencies {
            plugins,
            core_libraries,
            test_libraries,
        })
    }
}
