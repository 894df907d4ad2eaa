//! Local library retrieval
//!
//! Copies a shared library from a directory on disk into a job workspace the
//! same way a source-control retriever would check it out: only the files a
//! library is made of are copied, with their relative layout preserved.
//!
//! The file set is fixed:
//!
//! - `src/**/*.groovy`
//! - `vars/*.groovy`
//! - `vars/*.txt`
//! - `resources/**`

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Glob set describing the files of a shared library.
pub const LIBRARY_GLOBS: [&str; 4] = [
    "src/**/*.groovy",
    "vars/*.groovy",
    "vars/*.txt",
    "resources/**",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled form of [`LIBRARY_GLOBS`].
#[derive(Debug, Clone)]
pub struct LibraryFileFilter {
    patterns: Vec<Pattern>,
}

impl LibraryFileFilter {
    pub fn new() -> Result<Self> {
        let patterns = LIBRARY_GLOBS
            .iter()
            .map(|g| Pattern::new(g))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether a `/`-separated path relative to the library root belongs to
    /// the library.
    pub fn matches(&self, relative: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }
}

/// Files copied by one retrieval, relative to the library root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
}

/// Copy the library at `local_root` into `target`.
///
/// A single diagnostic line naming both paths is written to `sink` before any
/// file is copied.
pub fn copy_library(local_root: &Path, target: &Path, sink: &mut dyn Write) -> Result<CopyReport> {
    writeln!(
        sink,
        "Copying library from local path {} to workspace path {}",
        local_root.display(),
        target.display()
    )?;

    if !local_root.is_dir() {
        return Err(Error::filesystem(local_root, "library root is not a directory"));
    }

    let filter = LibraryFileFilter::new()?;
    let mut report = CopyReport::default();

    for entry in WalkDir::new(local_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(local_root)
            .map_err(|e| Error::filesystem(entry.path(), e))?;
        let normalized = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !filter.matches(&normalized) {
            continue;
        }

        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
        }
        fs::copy(entry.path(), &destination).map_err(|e| Error::filesystem(&destination, e))?;
        debug!("Copied {}", normalized);
        report.copied.push(relative.to_path_buf());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_filter_matches_library_files() {
        let filter = LibraryFileFilter::new().unwrap();
        assert!(filter.matches("src/com/example/Helper.groovy"));
        assert!(filter.matches("src/Top.groovy"));
        assert!(filter.matches("vars/deploy.groovy"));
        assert!(filter.matches("vars/deploy.txt"));
        assert!(filter.matches("resources/com/example/config.json"));
    }

    #[test]
    fn test_filter_rejects_other_files() {
        let filter = LibraryFileFilter::new().unwrap();
        assert!(!filter.matches("src/com/example/Helper.java"));
        assert!(!filter.matches("vars/nested/deploy.groovy"));
        assert!(!filter.matches("vars/deploy.md"));
        assert!(!filter.matches("test/unit/groovy/DeployTest.groovy"));
        assert!(!filter.matches("build.gradle"));
        assert!(!filter.matches("README.md"));
    }

    #[test]
    fn test_copy_only_matching_files() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let root = source.path();
        write(root, "src/com/example/Helper.groovy", "class Helper {}");
        write(root, "src/com/example/Notes.md", "notes");
        write(root, "vars/deploy.groovy", "def call() {}");
        write(root, "vars/deploy.txt", "Deploys things");
        write(root, "vars/sub/skip.groovy", "skip");
        write(root, "resources/com/example/data.json", "{}");
        write(root, "test/unit/groovy/HelperTest.groovy", "test");
        write(root, "build.gradle", "plugins {}");

        let mut sink = Vec::new();
        let report = copy_library(root, target.path(), &mut sink).unwrap();

        let copied: Vec<String> = report
            .copied
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            copied,
            vec![
                "resources/com/example/data.json",
                "src/com/example/Helper.groovy",
                "vars/deploy.groovy",
                "vars/deploy.txt",
            ]
        );

        let out = target.path();
        assert_eq!(
            fs::read_to_string(out.join("src/com/example/Helper.groovy")).unwrap(),
            "class Helper {}"
        );
        assert!(out.join("resources/com/example/data.json").exists());
        assert!(!out.join("src/com/example/Notes.md").exists());
        assert!(!out.join("vars/sub/skip.groovy").exists());
        assert!(!out.join("test").exists());
        assert!(!out.join("build.gradle").exists());
    }

    #[test]
    fn test_copy_emits_one_diagnostic_line() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write(source.path(), "vars/a.groovy", "");

        let mut sink = Vec::new();
        copy_library(source.path(), target.path(), &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(&source.path().display().to_string()));
        assert!(text.contains(&target.path().display().to_string()));
    }

    #[test]
    fn test_copy_missing_root_fails_with_path() {
        let target = TempDir::new().unwrap();
        let missing = target.path().join("does-not-exist");
        let err = copy_library(&missing, target.path(), &mut std::io::sink()).unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }
}
