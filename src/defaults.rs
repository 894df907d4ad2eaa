//! Default values for pipeline-lib-build configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;
use std::time::Duration;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".pipeline-library.yaml";

/// Build output directory, relative to the project directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

pub const DEFAULT_RETRIEVER_CLASS: &str = crate::generator::DEFAULT_CLASS_NAME;

pub const DEFAULT_RETRIEVER_PACKAGE: &str = crate::generator::DEFAULT_PACKAGE;

/// How long a downloaded file is reused before it is fetched again.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns the default download cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/pipeline-lib-build` (XDG Base Directory)
/// - macOS: `~/Library/Caches/pipeline-lib-build`
/// - Windows: `{FOLDERID_LocalAppData}\pipeline-lib-build`
///
/// Falls back to `.pipeline-lib-build-cache` in the current directory if the
/// platform cache directory cannot be determined.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("pipeline-lib-build"))
        .unwrap_or_else(|| PathBuf::from(".pipeline-lib-build-cache"))
}
