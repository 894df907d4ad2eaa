//! Extra plugin dependencies declared by the user

use log::debug;
use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::error::Result;

/// Group used by the `cloudbees` helper.
pub const CLOUDBEES_GROUP: &str = "com.cloudbees.jenkins.plugins";
/// Group used by the `workflow` helper.
pub const WORKFLOW_GROUP: &str = "org.jenkins-ci.plugins.workflow";
/// Group used by the `jvnet` helper.
pub const JVNET_GROUP: &str = "org.jvnet.hudson.plugins";
/// Group used by the `jenkins_ci` helper.
pub const JENKINS_CI_GROUP: &str = "org.jenkins-ci.plugins";
/// Group used by the `blueocean` helper.
pub const BLUEOCEAN_GROUP: &str = "io.jenkins.blueocean";

/// Ordered accumulator of user-declared plugin coordinates.
///
/// Insertion order is preserved and entries are never de-duplicated, so two
/// declarations of the same `group:name` both reach the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginDependencySpec {
    dependencies: Vec<Coordinate>,
}

impl PluginDependencySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built coordinate.
    pub fn add(&mut self, coordinate: Coordinate) -> &mut Self {
        debug!("Declared plugin dependency {}", coordinate);
        self.dependencies.push(coordinate);
        self
    }

    /// Append `group:name:version`.
    pub fn dependency(&mut self, group: &str, name: &str, version: &str) -> Result<&mut Self> {
        let coordinate = Coordinate::new(group, name, version)?;
        Ok(self.add(coordinate))
    }

    pub fn cloudbees(&mut self, name: &str, version: &str) -> Result<&mut Self> {
        self.dependency(CLOUDBEES_GROUP, name, version)
    }

    pub fn workflow(&mut self, name: &str, version: &str) -> Result<&mut Self> {
        self.dependency(WORKFLOW_GROUP, name, version)
    }

    pub fn jvnet(&mut self, name: &str, version: &str) -> Result<&mut Self> {
        self.dependency(JVNET_GROUP, name, version)
    }

    pub fn jenkins_ci(&mut self, name: &str, version: &str) -> Result<&mut Self> {
        self.dependency(JENKINS_CI_GROUP, name, version)
    }

    pub fn blueocean(&mut self, name: &str, version: &str) -> Result<&mut Self> {
        self.dependency(BLUEOCEAN_GROUP, name, version)
    }

    /// Declared coordinates in insertion order.
    pub fn dependencies(&self) -> &[Coordinate] {
        &self.dependencies
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
