//! # Version Catalog
//!
//! Maps the fixed set of component slots (host runtime, test tooling and the
//! ten workflow plugins) to version strings. The catalog starts out with
//! built-in defaults, accepts overrides while the project is being declared,
//! and is frozen exactly once when composition begins. Every downstream
//! builder reads the immutable [`CatalogSnapshot`] returned by
//! [`VersionCatalog::freeze`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};

/// A catalog slot that can carry a version override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Component {
    Groovy,
    Core,
    PipelineTestUnit,
    TestHarness,
    WorkflowApi,
    WorkflowBasicSteps,
    WorkflowCps,
    WorkflowDurableTaskStep,
    WorkflowGlobalLib,
    WorkflowJob,
    WorkflowMultibranch,
    WorkflowScmStep,
    WorkflowStepApi,
    WorkflowSupport,
}

impl Component {
    /// Every slot, in declaration order.
    pub const ALL: [Component; 14] = [
        Component::Groovy,
        Component::Core,
        Component::PipelineTestUnit,
        Component::TestHarness,
        Component::WorkflowApi,
        Component::WorkflowBasicSteps,
        Component::WorkflowCps,
        Component::WorkflowDurableTaskStep,
        Component::WorkflowGlobalLib,
        Component::WorkflowJob,
        Component::WorkflowMultibranch,
        Component::WorkflowScmStep,
        Component::WorkflowStepApi,
        Component::WorkflowSupport,
    ];

    /// The ten workflow plugin slots, in resolution order.
    pub const WORKFLOW_PLUGINS: [Component; 10] = [
        Component::WorkflowApi,
        Component::WorkflowBasicSteps,
        Component::WorkflowCps,
        Component::WorkflowDurableTaskStep,
        Component::WorkflowGlobalLib,
        Component::WorkflowJob,
        Component::WorkflowMultibranch,
        Component::WorkflowScmStep,
        Component::WorkflowStepApi,
        Component::WorkflowSupport,
    ];

    /// The property name users set in configuration.
    pub fn key(self) -> &'static str {
        match self {
            Component::Groovy => "groovyVersion",
            Component::Core => "coreVersion",
            Component::PipelineTestUnit => "pipelineTestUnitVersion",
            Component::TestHarness => "testHarnessVersion",
            Component::WorkflowApi => "workflowApiPluginVersion",
            Component::WorkflowBasicSteps => "workflowBasicStepsPluginVersion",
            Component::WorkflowCps => "workflowCpsPluginVersion",
            Component::WorkflowDurableTaskStep => "workflowDurableTaskStepPluginVersion",
            Component::WorkflowGlobalLib => "workflowGlobalCpsLibraryPluginVersion",
            Component::WorkflowJob => "workflowJobPluginVersion",
            Component::WorkflowMultibranch => "workflowMultibranchPluginVersion",
            Component::WorkflowScmStep => "workflowScmStepPluginVersion",
            Component::WorkflowStepApi => "workflowStepApiPluginVersion",
            Component::WorkflowSupport => "workflowSupportPluginVersion",
        }
    }

    /// Built-in version used when the user does not override the slot.
    pub fn default_version(self) -> &'static str {
        match self {
            Component::Groovy => "2.4.11",
            Component::Core => "2.60.2",
            Component::PipelineTestUnit => "1.1",
            Component::TestHarness => "2.24",
            Component::WorkflowApi => "2.20",
            Component::WorkflowBasicSteps => "2.6",
            Component::WorkflowCps => "2.36",
            Component::WorkflowDurableTaskStep => "2.13",
            Component::WorkflowGlobalLib => "2.8",
            Component::WorkflowJob => "2.12.1",
            Component::WorkflowMultibranch => "2.16",
            Component::WorkflowScmStep => "2.6",
            Component::WorkflowStepApi => "2.12",
            Component::WorkflowSupport => "2.14",
        }
    }

    /// Whether the slot may be left without a version.
    pub fn is_optional(self) -> bool {
        matches!(self, Component::PipelineTestUnit)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Component::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| Error::Configuration {
                message: format!("unknown component '{}'", s),
                hint: Some(format!(
                    "Use one of: {}",
                    Component::ALL.map(Component::key).join(", ")
                )),
            })
    }
}

/// Mutable component → version mapping with a one-time override window.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    versions: BTreeMap<Component, Option<String>>,
    frozen: Option<CatalogSnapshot>,
}

impl VersionCatalog {
    /// Create a catalog populated with the built-in defaults.
    pub fn new() -> Self {
        let versions = Component::ALL
            .into_iter()
            .map(|c| (c, Some(c.default_version().to_string())))
            .collect();
        Self {
            versions,
            frozen: None,
        }
    }

    /// Override a slot by its configuration key, e.g. `coreVersion`.
    pub fn set_version(&mut self, component: &str, value: &str) -> Result<()> {
        let component = Component::from_str(component)?;
        self.set(component, value)
    }

    /// Override a slot.
    pub fn set(&mut self, component: Component, value: &str) -> Result<()> {
        self.ensure_open(component)?;
        if value.trim().is_empty() {
            return Err(Error::configuration(format!(
                "version for '{}' must not be blank",
                component
            )));
        }
        if value.contains(':') {
            return Err(Error::Format {
                input: value.to_string(),
                message: format!("version for '{}' must not contain ':'", component),
            });
        }
        debug!("Catalog override {} = {}", component, value);
        self.versions.insert(component, Some(value.to_string()));
        Ok(())
    }

    /// Drop the version of an optional slot so nothing is resolved for it.
    pub fn unset(&mut self, component: Component) -> Result<()> {
        self.ensure_open(component)?;
        if !component.is_optional() {
            return Err(Error::configuration(format!(
                "'{}' is required and cannot be unset",
                component
            )));
        }
        debug!("Catalog unset {}", component);
        self.versions.insert(component, None);
        Ok(())
    }

    /// Current value of a slot, whether or not the catalog is frozen.
    pub fn get(&self, component: Component) -> Option<&str> {
        self.versions.get(&component).and_then(|v| v.as_deref())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Close the override window and return the immutable snapshot.
    ///
    /// Calling this again returns the same snapshot.
    pub fn freeze(&mut self) -> CatalogSnapshot {
        if let Some(snapshot) = &self.frozen {
            return snapshot.clone();
        }
        let snapshot = CatalogSnapshot {
            versions: self.versions.clone(),
        };
        debug!("Version catalog frozen with {} slots", snapshot.versions.len());
        self.frozen = Some(snapshot.clone());
        snapshot
    }

    /// The frozen snapshot, if `freeze` has been called.
    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.frozen.as_ref()
    }

    fn ensure_open(&self, component: Component) -> Result<()> {
        if self.is_frozen() {
            return Err(Error::Configuration {
                message: format!(
                    "cannot change '{}' after the version catalog has been frozen",
                    component
                ),
                hint: Some("Set versions before the build graph is composed".to_string()),
            });
        }
        Ok(())
    }
}

impl Default for VersionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the catalog taken at freeze time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSnapshot {
    versions: BTreeMap<Component, Option<String>>,
}

impl CatalogSnapshot {
    /// Version of an optional or required slot.
    pub fn get(&self, component: Component) -> Option<&str> {
        self.versions.get(&component).and_then(|v| v.as_deref())
    }

    /// Version of a required slot.
    pub fn require(&self, component: Component) -> Result<&str> {
        self.get(component).ok_or_else(|| {
            Error::configuration(format!("no version configured for '{}'", component))
        })
    }

    /// All slots as `(key, version)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, Option<&str>)> {
        Component::ALL
            .into_iter()
            .map(|c| (c.key(), self.get(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_present() {
        let catalog = VersionCatalog::new();
        assert_eq!(catalog.get(Component::Core), Some("2.60.2"));
        for c in Component::ALL {
            assert!(catalog.get(c).is_some(), "missing default for {}", c);
        }
    }

    #[test]
    fn test_set_version_by_key() {
        let mut catalog = VersionCatalog::new();
        catalog.set_version("workflowApiPluginVersion", "9.9").unwrap();
        assert_eq!(catalog.get(Component::WorkflowApi), Some("9.9"));
    }

    #[test]
    fn test_set_version_unknown_component() {
        let mut catalog = VersionCatalog::new();
        let err = catalog.set_version("gitPluginVersion", "1.0").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("gitPluginVersion"));
    }

    #[test]
    fn test_set_after_freeze_fails_and_keeps_value() {
        let mut catalog = VersionCatalog::new();
        catalog.set(Component::WorkflowApi, "9.9").unwrap();
        catalog.freeze();

        let err = catalog.set(Component::WorkflowApi, "10.0").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(catalog.get(Component::WorkflowApi), Some("9.9"));
        assert_eq!(
            catalog.snapshot().unwrap().get(Component::WorkflowApi),
            Some("9.9")
        );
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let mut catalog = VersionCatalog::new();
        catalog.set(Component::Core, "2.73").unwrap();
        let first = catalog.freeze();
        let second = catalog.freeze();
        assert_eq!(first, second);
        assert_eq!(second.get(Component::Core), Some("2.73"));
    }

    #[test]
    fn test_unset_optional_slot() {
        let mut catalog = VersionCatalog::new();
        catalog.unset(Component::PipelineTestUnit).unwrap();
        let snapshot = catalog.freeze();
        assert_eq!(snapshot.get(Component::PipelineTestUnit), None);
    }

    #[test]
    fn test_unset_required_slot_fails() {
        let mut catalog = VersionCatalog::new();
        assert!(catalog.unset(Component::Core).is_err());
        assert_eq!(catalog.get(Component::Core), Some("2.60.2"));
    }

    #[test]
    fn test_blank_version_rejected() {
        let mut catalog = VersionCatalog::new();
        assert!(catalog.set(Component::Groovy, "  ").is_err());
    }

    #[test]
    fn test_version_with_separator_rejected() {
        let mut catalog = VersionCatalog::new();
        let err = catalog.set(Component::Core, "2.60:1").unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
        assert_eq!(catalog.get(Component::Core), Some("2.60.2"));
    }

    #[test]
    fn test_component_keys_round_trip() {
        for c in Component::ALL {
            assert_eq!(Component::from_str(c.key()).unwrap(), c);
        }
    }
}
