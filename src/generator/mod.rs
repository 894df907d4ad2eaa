//! # Local Library Retriever Generation
//!
//! Generates the source file that lets integration tests load the library
//! straight from the working tree instead of through source control.
//!
//! ## Lifecycle
//!
//! ```text
//! NotStarted -> Validating -> Generating -> Written
//!                   |              |
//!                   +-> Failed <---+
//! ```
//!
//! 1.  **Validating**: identifiers, the library file set and the destination
//!     extension are checked against the descriptor.
//! 2.  **Generating**: the class model is rendered completely in memory.
//! 3.  **Written**: the text is written to a temporary file next to the
//!     destination and renamed over it in one step. If the destination already
//!     holds identical bytes, nothing is written and the run is reported as
//!     up to date.

pub mod retriever;
pub mod template;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::retrieval::LIBRARY_GLOBS;

/// Default simple name of the generated class.
pub const DEFAULT_CLASS_NAME: &str = "LocalLibraryRetriever";
/// Default package of the generated class.
pub const DEFAULT_PACKAGE: &str = "com.example.pipeline.codegen";

/// Language the generated source is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    #[default]
    Java,
    Groovy,
}

impl SourceLanguage {
    pub fn extension(self) -> &'static str {
        match self {
            SourceLanguage::Java => "java",
            SourceLanguage::Groovy => "groovy",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Inputs that affect the rendered text beyond the class identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateInputs {
    pub language: SourceLanguage,
    pub library_globs: Vec<String>,
}

impl Default for TemplateInputs {
    fn default() -> Self {
        Self {
            language: SourceLanguage::default(),
            library_globs: LIBRARY_GLOBS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// Everything needed to produce one generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedArtifactDescriptor {
    pub class_name: String,
    pub package_name: String,
    pub output_root: PathBuf,
    pub template_inputs: TemplateInputs,
}

impl GeneratedArtifactDescriptor {
    pub fn new(class_name: &str, package_name: &str, output_root: impl Into<PathBuf>) -> Self {
        Self {
            class_name: class_name.to_string(),
            package_name: package_name.to_string(),
            output_root: output_root.into(),
            template_inputs: TemplateInputs::default(),
        }
    }

    /// `<package/as/dirs>/<ClassName>.<ext>`, relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .package_name
            .split('.')
            .filter(|s| !s.is_empty())
            .collect();
        path.push(format!(
            "{}.{}",
            self.class_name,
            self.template_inputs.language.extension()
        ));
        path
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_root.join(self.relative_path())
    }
}

/// Progress of the current generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    NotStarted,
    Validating,
    Generating,
    Written,
    Failed,
}

/// Result of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// New content was written.
    Written(PathBuf),
    /// The destination already held identical content; nothing was touched.
    UpToDate(PathBuf),
}

impl GenerationOutcome {
    pub fn path(&self) -> &Path {
        match self {
            GenerationOutcome::Written(p) | GenerationOutcome::UpToDate(p) => p,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, GenerationOutcome::UpToDate(_))
    }
}

/// Generates the local library retriever source.
#[derive(Debug, Default)]
pub struct LibraryRetrieverGenerator {
    state: GenerationState,
}

impl LibraryRetrieverGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Generate into the descriptor's own output path.
    pub fn generate(
        &mut self,
        descriptor: &GeneratedArtifactDescriptor,
    ) -> Result<GenerationOutcome> {
        let destination = descriptor.output_path();
        self.generate_to(descriptor, &destination)
    }

    /// Generate into an explicit destination file.
    pub fn generate_to(
        &mut self,
        descriptor: &GeneratedArtifactDescriptor,
        destination: &Path,
    ) -> Result<GenerationOutcome> {
        self.state = GenerationState::Validating;
        if let Err(e) = validate(descriptor, destination) {
            self.state = GenerationState::Failed;
            return Err(e);
        }

        self.state = GenerationState::Generating;
        let source = render(descriptor);
        match write_if_changed(destination, source.as_bytes()) {
            Ok(outcome) => {
                self.state = GenerationState::Written;
                match &outcome {
                    GenerationOutcome::Written(p) => info!("Generated {}", p.display()),
                    GenerationOutcome::UpToDate(p) => info!("{} is up to date", p.display()),
                }
                Ok(outcome)
            }
            Err(e) => {
                self.state = GenerationState::Failed;
                Err(e)
            }
        }
    }
}

/// Render the retriever source for `descriptor` without touching the disk.
pub fn render(descriptor: &GeneratedArtifactDescriptor) -> String {
    template::render(&retriever::retriever_model(
        &descriptor.class_name,
        &descriptor.package_name,
        &descriptor.template_inputs,
    ))
}

/// Check `descriptor` against `destination` without rendering or writing.
pub fn validate(descriptor: &GeneratedArtifactDescriptor, destination: &Path) -> Result<()> {
    let path = destination.display().to_string();
    let invalid = |message: String| Error::Validation {
        path: path.clone(),
        message,
    };

    let expected = descriptor.template_inputs.language.extension();
    let actual = destination.extension().and_then(|e| e.to_str());
    if actual != Some(expected) {
        return Err(invalid(format!(
            "destination extension {} does not match target source extension '{}'",
            actual.map(|a| format!("'{}'", a)).unwrap_or_else(|| "(none)".to_string()),
            expected
        )));
    }

    let identifier = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$")?;
    if !identifier.is_match(&descriptor.class_name) {
        return Err(invalid(format!(
            "'{}' is not a valid class name",
            descriptor.class_name
        )));
    }
    if !descriptor.package_name.is_empty()
        && !descriptor
            .package_name
            .split('.')
            .all(|segment| identifier.is_match(segment))
    {
        return Err(invalid(format!(
            "'{}' is not a valid package name",
            descriptor.package_name
        )));
    }

    let mut requested: Vec<&str> = descriptor
        .template_inputs
        .library_globs
        .iter()
        .map(String::as_str)
        .collect();
    requested.sort_unstable();
    let mut fixed: Vec<&str> = LIBRARY_GLOBS.to_vec();
    fixed.sort_unstable();
    if requested != fixed {
        return Err(invalid(format!(
            "library file set must be exactly {}",
            LIBRARY_GLOBS.join(", ")
        )));
    }

    Ok(())
}

fn write_if_changed(destination: &Path, content: &[u8]) -> Result<GenerationOutcome> {
    if let Ok(existing) = fs::read(destination) {
        if existing == content {
            debug!("Skipping write of unchanged {}", destination.display());
            return Ok(GenerationOutcome::UpToDate(destination.to_path_buf()));
        }
    }

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(|e| Error::filesystem(parent, e))?;
    staged
        .write_all(content)
        .and_then(|_| staged.flush())
        .map_err(|e| Error::filesystem(staged.path(), e))?;
    staged
        .persist(destination)
        .map_err(|e| Error::filesystem(destination, e.error))?;

    Ok(GenerationOutcome::Written(destination.to_path_buf()))
}
