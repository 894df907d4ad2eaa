//! # Pipeline Library Build
//!
//! This library compiles the declarative description of a Jenkins pipeline
//! shared library project into a concrete build graph: resolved plugin and
//! library coordinates, classpath nodes per source root, ordered test stages
//! and a generated local library retriever for integration tests. It is used
//! by the `pipeline-lib-build` command-line tool but can also be embedded in
//! other build tooling.
//!
//! ## Quick Example
//!
//! ```
//! use pipeline_lib_build::config;
//! use pipeline_lib_build::project::SharedLibraryProject;
//!
//! let config = config::parse(r#"
//! coreVersion: "2.89.1"
//! dependencies:
//!   - cloudbees:
//!       name: cloudbees-folder
//!       version: "6.1.2"
//! "#).unwrap();
//!
//! let mut project = SharedLibraryProject::new("/work/my-library");
//! config.apply_to(&mut project).unwrap();
//! let build = project.compose().unwrap();
//!
//! let compile = build.graph().effective_coordinates("compile").unwrap();
//! assert!(compile.iter().any(|c| c.to_string() == "org.jenkins-ci.main:jenkins-core:2.89.1"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Coordinates (`coordinate`)**: immutable `group:name:version` values.
//! - **Catalog (`catalog`)**: versions of the fixed components, overridable
//!   until the build is composed.
//! - **Dependencies (`dependencies`, `resolver`)**: user-declared plugins plus
//!   the fixed plugin and library set, resolved exactly once.
//! - **Classpath graph (`layout`, `classpath`)**: compile and runtime nodes per
//!   source root, extending hidden nodes that hold the resolved coordinates.
//! - **Stages (`stages`)**: compile and test stages with hard prerequisites and
//!   ordering-only constraints.
//! - **Code generation (`generator`, `retrieval`)**: the local library retriever
//!   source and the file-copy contract it implements.
//!
//! ## Execution Flow
//!
//! 1.  **Declare**: versions and dependencies are set on a
//!     [`project::SharedLibraryProject`], directly or from `.pipeline-library.yaml`.
//! 2.  **Compose**: the catalog is frozen, dependencies are resolved, the
//!     classpath graph is built and populated and stages are wired.
//! 3.  **Act**: the composed build is queried for classpaths and stage plans,
//!     and the retriever source is generated.

pub mod catalog;
pub mod classpath;
pub mod config;
pub mod coordinate;
pub mod defaults;
pub mod dependencies;
pub mod download;
pub mod error;
pub mod generator;
pub mod layout;
pub mod project;
pub mod resolver;
pub mod retrieval;
pub mod stages;

#[cfg(test)]
mod coordinate_proptest;
