//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `.pipeline-library.yaml` configuration file and the logic for applying it
//! to a [`SharedLibraryProject`] during its declaration phase.
//!
//! ## Example
//!
//! ```yaml
//! coreVersion: "2.89.1"
//! pipelineTestUnitVersion: null
//! workflow:
//!   cpsPluginVersion: "2.41"
//! dependencies:
//!   - cloudbees:
//!       name: cloudbees-folder
//!       version: "6.1.2"
//!   - dependency: "org.jenkins-ci.plugins:credentials:2.1.16"
//! build:
//!   buildDir: out
//! ```
//!
//! Unknown keys are rejected so that a typo never silently falls back to a
//! default version.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Component;
use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::project::SharedLibraryProject;

/// Top-level contents of `.pipeline-library.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PipelineLibraryConfig {
    #[serde(default)]
    pub groovy_version: Option<String>,
    #[serde(default)]
    pub core_version: Option<String>,
    /// `Some(None)` when the key is present with a `null` value, which drops
    /// the pipeline unit helper from the test libraries.
    #[serde(default, deserialize_with = "present_or_null")]
    pub pipeline_test_unit_version: Option<Option<String>>,
    #[serde(default)]
    pub test_harness_version: Option<String>,
    #[serde(default)]
    pub workflow: WorkflowVersions,
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
    #[serde(default)]
    pub build: BuildConfig,
}

fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Versions of the workflow plugins every library build depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkflowVersions {
    #[serde(default)]
    pub api_plugin_version: Option<String>,
    #[serde(default)]
    pub basic_steps_plugin_version: Option<String>,
    #[serde(default)]
    pub cps_plugin_version: Option<String>,
    #[serde(default)]
    pub durable_task_step_plugin_version: Option<String>,
    #[serde(default)]
    pub global_cps_library_plugin_version: Option<String>,
    #[serde(default)]
    pub job_plugin_version: Option<String>,
    #[serde(default)]
    pub multibranch_plugin_version: Option<String>,
    #[serde(default)]
    pub scm_step_plugin_version: Option<String>,
    #[serde(default)]
    pub step_api_plugin_version: Option<String>,
    #[serde(default)]
    pub support_plugin_version: Option<String>,
}

impl WorkflowVersions {
    fn overrides(&self) -> Vec<(Component, &str)> {
        [
            (Component::WorkflowApi, &self.api_plugin_version),
            (Component::WorkflowBasicSteps, &self.basic_steps_plugin_version),
            (Component::WorkflowCps, &self.cps_plugin_version),
            (Component::WorkflowDurableTaskStep, &self.durable_task_step_plugin_version),
            (Component::WorkflowGlobalLib, &self.global_cps_library_plugin_version),
            (Component::WorkflowJob, &self.job_plugin_version),
            (Component::WorkflowMultibranch, &self.multibranch_plugin_version),
            (Component::WorkflowScmStep, &self.scm_step_plugin_version),
            (Component::WorkflowStepApi, &self.step_api_plugin_version),
            (Component::WorkflowSupport, &self.support_plugin_version),
        ]
        .into_iter()
        .filter_map(|(component, version)| version.as_deref().map(|v| (component, v)))
        .collect()
    }
}

/// A plugin named within one of the well-known groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginRef {
    pub name: String,
    pub version: String,
}

/// An explicit coordinate, either as `group:name:version` or spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum CoordinateRef {
    Notation(String),
    Parts {
        group: String,
        name: String,
        version: String,
    },
}

/// One item of the `dependencies:` list.
///
/// Each item names exactly one kind; a second key fails the whole item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum DependencyEntry {
    Cloudbees { cloudbees: PluginRef },
    Workflow { workflow: PluginRef },
    Jvnet { jvnet: PluginRef },
    JenkinsCi {
        #[serde(rename = "jenkinsCi")]
        jenkins_ci: PluginRef,
    },
    Blueocean { blueocean: PluginRef },
    Dependency { dependency: CoordinateRef },
}

/// Output locations and the generated retriever's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    #[serde(default)]
    pub generated_sources_dir: Option<PathBuf>,
    #[serde(default)]
    pub retriever_class: Option<String>,
    #[serde(default)]
    pub retriever_package: Option<String>,
}

impl PipelineLibraryConfig {
    /// Declare everything in this configuration on `project`.
    ///
    /// Fails if the project has already been composed.
    pub fn apply_to(&self, project: &mut SharedLibraryProject) -> Result<()> {
        let catalog = project.catalog_mut()?;
        for (component, version) in [
            (Component::Groovy, &self.groovy_version),
            (Component::Core, &self.core_version),
            (Component::TestHarness, &self.test_harness_version),
        ] {
            if let Some(version) = version {
                catalog.set(component, version)?;
            }
        }
        match &self.pipeline_test_unit_version {
            Some(Some(version)) => catalog.set(Component::PipelineTestUnit, version)?,
            Some(None) => catalog.unset(Component::PipelineTestUnit)?,
            None => {}
        }
        for (component, version) in self.workflow.overrides() {
            catalog.set(component, version)?;
        }

        let spec = project.dependencies_mut()?;
        for entry in &self.dependencies {
            match entry {
                DependencyEntry::Cloudbees { cloudbees: p } => spec.cloudbees(&p.name, &p.version)?,
                DependencyEntry::Workflow { workflow: p } => spec.workflow(&p.name, &p.version)?,
                DependencyEntry::Jvnet { jvnet: p } => spec.jvnet(&p.name, &p.version)?,
                DependencyEntry::JenkinsCi { jenkins_ci: p } => {
                    spec.jenkins_ci(&p.name, &p.version)?
                }
                DependencyEntry::Blueocean { blueocean: p } => spec.blueocean(&p.name, &p.version)?,
                DependencyEntry::Dependency {
                    dependency: CoordinateRef::Notation(notation),
                } => spec.add(Coordinate::parse(notation)?),
                DependencyEntry::Dependency {
                    dependency:
                        CoordinateRef::Parts {
                            group,
                            name,
                            version,
                        },
                } => spec.dependency(group, name, version)?,
            };
        }

        let settings = project.settings_mut()?;
        if let Some(build_dir) = &self.build.build_dir {
            settings.build_dir = build_dir.clone();
        }
        if let Some(dir) = &self.build.generated_sources_dir {
            settings.generated_sources_dir = Some(dir.clone());
        }
        if let Some(class) = &self.build.retriever_class {
            settings.retriever_class = class.clone();
        }
        if let Some(package) = &self.build.retriever_package {
            settings.retriever_package = package.clone();
        }

        debug!(
            "Applied configuration with {} declared dependencies",
            self.dependencies.len()
        );
        Ok(())
    }
}

/// Parses a YAML string into a [`PipelineLibraryConfig`].
///
/// An empty document is the empty configuration.
pub fn parse(yaml_content: &str) -> Result<PipelineLibraryConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(PipelineLibraryConfig::default());
    }
    serde_yaml::from_str(yaml_content).map_err(Error::Yaml)
}

/// Parse a configuration from a YAML file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<PipelineLibraryConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
    parse(&content).map_err(|e| match e {
        Error::Yaml(inner) => Error::Configuration {
            message: format!("{}: {}", path.display(), inner),
            hint: Some("Check the key names against the documented configuration".to_string()),
        },
        other => other,
    })
}
