//! # Shared Library Project
//!
//! The two-phase protocol of a shared library build.
//!
//! 1.  **Declare**: build scripts (or a configuration file) override catalog
//!     versions and declare plugin dependencies through [`SharedLibraryProject::catalog_mut`]
//!     and [`SharedLibraryProject::dependencies_mut`].
//! 2.  **Compose**: [`SharedLibraryProject::compose`] freezes the catalog,
//!     resolves dependencies once, builds and populates the classpath graph and
//!     wires the stages. The result is an immutable [`ComposedBuild`].
//!
//! Once composed, the declarations are closed. Every later mutation fails.

use std::path::{Path, PathBuf};

use log::info;

use crate::catalog::{CatalogSnapshot, VersionCatalog};
use crate::classpath::{ClasspathGraph, ClasspathGraphBuilder};
use crate::defaults;
use crate::dependencies::PluginDependencySpec;
use crate::error::{Error, Result};
use crate::generator::GeneratedArtifactDescriptor;
use crate::layout::{ProjectLayoutComposer, SourceRoot};
use crate::resolver::{DependencySetResolver, ResolvedDependencies};
use crate::stages::{StageGraph, TestStageOrchestrator};

/// Paths and names that shape the build output.
///
/// Relative paths are resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub build_dir: PathBuf,
    /// Defaults to `<build_dir>/generated-src/integrationTest` when unset.
    pub generated_sources_dir: Option<PathBuf>,
    pub retriever_class: String,
    pub retriever_package: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from(defaults::DEFAULT_BUILD_DIR),
            generated_sources_dir: None,
            retriever_class: defaults::DEFAULT_RETRIEVER_CLASS.to_string(),
            retriever_package: defaults::DEFAULT_RETRIEVER_PACKAGE.to_string(),
        }
    }
}

impl BuildSettings {
    pub fn generated_sources_dir(&self) -> PathBuf {
        self.generated_sources_dir
            .clone()
            .unwrap_or_else(|| self.build_dir.join("generated-src").join("integrationTest"))
    }
}

/// A shared library project in its declaration phase.
#[derive(Debug)]
pub struct SharedLibraryProject {
    project_dir: PathBuf,
    catalog: VersionCatalog,
    dependencies: PluginDependencySpec,
    layout: ProjectLayoutComposer,
    settings: BuildSettings,
    composed: bool,
}

impl SharedLibraryProject {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            catalog: VersionCatalog::new(),
            dependencies: PluginDependencySpec::new(),
            layout: ProjectLayoutComposer::new(),
            settings: BuildSettings::default(),
            composed: false,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    pub fn dependencies(&self) -> &PluginDependencySpec {
        &self.dependencies
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn is_composed(&self) -> bool {
        self.composed
    }

    pub fn catalog_mut(&mut self) -> Result<&mut VersionCatalog> {
        self.ensure_declaring("version catalog")?;
        Ok(&mut self.catalog)
    }

    pub fn dependencies_mut(&mut self) -> Result<&mut PluginDependencySpec> {
        self.ensure_declaring("plugin dependencies")?;
        Ok(&mut self.dependencies)
    }

    pub fn settings_mut(&mut self) -> Result<&mut BuildSettings> {
        self.ensure_declaring("build settings")?;
        Ok(&mut self.settings)
    }

    /// Close the declaration phase and compose the build.
    pub fn compose(&mut self) -> Result<ComposedBuild> {
        self.ensure_declaring("project")?;
        self.composed = true;

        let roots = self.layout.compose();
        let mut builder = ClasspathGraphBuilder::new();
        builder.build(&roots)?;

        let snapshot = self.catalog.freeze();
        let resolved = DependencySetResolver::new().resolve(&self.catalog, &self.dependencies)?;
        builder.populate(&resolved)?;
        let graph = builder.into_graph()?;

        let build_dir = self.resolve_path(&self.settings.build_dir);
        let stages = TestStageOrchestrator::new(&build_dir).wire();
        let retriever = GeneratedArtifactDescriptor::new(
            &self.settings.retriever_class,
            &self.settings.retriever_package,
            self.resolve_path(&self.settings.generated_sources_dir()),
        );

        info!(
            "Composed build for {} ({} plugins, {} classpath nodes)",
            self.project_dir.display(),
            resolved.plugins().len(),
            graph.len()
        );
        Ok(ComposedBuild {
            project_dir: self.project_dir.clone(),
            snapshot,
            resolved,
            roots,
            graph,
            stages,
            retriever,
        })
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    fn ensure_declaring(&self, what: &str) -> Result<()> {
        if self.composed {
            return Err(Error::Configuration {
                message: format!("{} cannot be changed after the build has been composed", what),
                hint: Some("Declare versions and dependencies before composing".to_string()),
            });
        }
        Ok(())
    }
}

/// Read-only result of composing a project.
#[derive(Debug)]
pub struct ComposedBuild {
    project_dir: PathBuf,
    snapshot: CatalogSnapshot,
    resolved: ResolvedDependencies,
    roots: Vec<SourceRoot>,
    graph: ClasspathGraph,
    stages: StageGraph,
    retriever: GeneratedArtifactDescriptor,
}

impl ComposedBuild {
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn resolved(&self) -> &ResolvedDependencies {
        &self.resolved
    }

    pub fn roots(&self) -> &[SourceRoot] {
        &self.roots
    }

    pub fn graph(&self) -> &ClasspathGraph {
        &self.graph
    }

    pub fn stages(&self) -> &StageGraph {
        &self.stages
    }

    pub fn retriever(&self) -> &GeneratedArtifactDescriptor {
        &self.retriever
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Component;
    use crate::stages::{Stage, BUILD_DIR_ENV};

    #[test]
    fn test_compose_with_defaults() {
        let mut project = SharedLibraryProject::new("/work/lib");
        let build = project.compose().unwrap();

        assert!(build.graph().is_populated());
        assert_eq!(build.roots().len(), 3);
        assert_eq!(build.snapshot().get(Component::Core), Some("2.60.2"));
        assert_eq!(
            build.retriever().output_root,
            Path::new("/work/lib/build/generated-src/integrationTest")
        );
        assert_eq!(build.stages().build_dir(), Path::new("/work/lib/build"));
    }

    #[test]
    fn test_declarations_flow_into_composition() {
        let mut project = SharedLibraryProject::new("/work/lib");
        project.catalog_mut().unwrap().set_version("coreVersion", "2.89.1").unwrap();
        project
            .dependencies_mut()
            .unwrap()
            .blueocean("blueocean-pipeline-api-impl", "1.3.0")
            .unwrap();

        let build = project.compose().unwrap();
        let compile = build.graph().effective_coordinates("compile").unwrap();
        let rendered: Vec<String> = compile.iter().map(|c| c.to_string()).collect();
        assert!(rendered.contains(&"org.jenkins-ci.main:jenkins-core:2.89.1".to_string()));
        assert!(rendered
            .contains(&"io.jenkins.blueocean:blueocean-pipeline-api-impl:1.3.0".to_string()));
    }

    #[test]
    fn test_mutation_after_compose_fails() {
        let mut project = SharedLibraryProject::new("/work/lib");
        project.compose().unwrap();

        assert!(matches!(project.catalog_mut(), Err(Error::Configuration { .. })));
        assert!(project.dependencies_mut().is_err());
        assert!(project.settings_mut().is_err());
        assert!(project.catalog().is_frozen());
    }

    #[test]
    fn test_second_compose_fails() {
        let mut project = SharedLibraryProject::new("/work/lib");
        project.compose().unwrap();
        let err = project.compose().unwrap_err();
        assert!(err.to_string().contains("after the build has been composed"));
    }

    #[test]
    fn test_absolute_build_dir_is_kept() {
        let mut project = SharedLibraryProject::new("/work/lib");
        project.settings_mut().unwrap().build_dir = PathBuf::from("/tmp/out");
        let build = project.compose().unwrap();

        let plan = build.stages().plan(&[Stage::IntegrationTest]).unwrap();
        assert_eq!(
            plan.environment_for(Stage::IntegrationTest).get(BUILD_DIR_ENV),
            Some(&"/tmp/out".to_string())
        );
        assert_eq!(
            build.retriever().output_root,
            Path::new("/tmp/out/generated-src/integrationTest")
        );
    }
}
