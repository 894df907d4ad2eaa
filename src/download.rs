//! # Download Cache
//!
//! Fetches single files (for example IDE descriptors of the pipeline DSL) into
//! a local cache directory and reuses them while they are younger than a
//! staleness window.
//!
//! Downloads go through the [`Fetcher`] trait. The default [`CurlFetcher`]
//! runs the system `curl` command, which picks up proxy settings and
//! certificates from the user's environment. Every fetch lands in a temporary
//! file inside the cache directory and is renamed into place only after it
//! completed, so a failed download never leaves a partial file behind.
//!
//! Nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Transfers the resource at a URL into a local file.
pub trait Fetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Fetcher backed by the system `curl` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlFetcher;

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let output = Command::new("curl")
            .args(["--silent", "--show-error", "--location"])
            .args(["--write-out", "%{http_code}"])
            .arg("--output")
            .arg(destination)
            .arg(url)
            .output()
            .map_err(|e| Error::Network {
                url: url.to_string(),
                message: format!("failed to run curl: {}", e),
                status: None,
            })?;

        if !output.status.success() {
            return Err(Error::Network {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                status: None,
            });
        }

        let status = String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<u16>()
            .ok();
        check_status(url, status)
    }
}

fn check_status(url: &str, status: Option<u16>) -> Result<()> {
    match status {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(code) => Err(Error::Network {
            url: url.to_string(),
            message: "server answered with a non-success status".to_string(),
            status: Some(code),
        }),
        None => Err(Error::Network {
            url: url.to_string(),
            message: "no HTTP status reported".to_string(),
            status: None,
        }),
    }
}

/// How a file was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A fresh copy was already in the cache.
    Cached(PathBuf),
    /// The file was fetched during this call.
    Downloaded(PathBuf),
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Cached(p) | DownloadOutcome::Downloaded(p) => p,
        }
    }
}

/// A directory of downloaded files with a staleness window.
#[derive(Debug, Clone)]
pub struct DownloadCache {
    root: PathBuf,
    max_age: Duration,
}

impl DownloadCache {
    pub fn new(root: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            root: root.into(),
            max_age,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Where `file_name` is stored in this cache.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        let plain = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !plain {
            return Err(Error::Configuration {
                message: format!("'{}' is not a plain file name", file_name),
                hint: Some("Pass a file name without directory separators".to_string()),
            });
        }
        Ok(self.root.join(file_name))
    }

    /// Whether the cached copy of `file_name` exists and is inside the window.
    pub fn is_fresh(&self, file_name: &str) -> Result<bool> {
        let path = self.path_for(file_name)?;
        let Ok(metadata) = fs::metadata(&path) else {
            return Ok(false);
        };
        let modified = metadata
            .modified()
            .map_err(|e| Error::filesystem(&path, e))?;
        Ok(modified
            .elapsed()
            .map(|age| age < self.max_age)
            .unwrap_or(false))
    }

    /// Return the cached `file_name`, fetching it from `url` when it is
    /// missing or stale.
    pub fn fetch(
        &self,
        url: &str,
        file_name: &str,
        fetcher: &dyn Fetcher,
    ) -> Result<DownloadOutcome> {
        let destination = self.path_for(file_name)?;
        if self.is_fresh(file_name)? {
            debug!("Cache hit for {} at {}", url, destination.display());
            return Ok(DownloadOutcome::Cached(destination));
        }

        debug!("Cache miss for {}", url);
        fs::create_dir_all(&self.root).map_err(|e| Error::filesystem(&self.root, e))?;
        let staged =
            NamedTempFile::new_in(&self.root).map_err(|e| Error::filesystem(&self.root, e))?;
        fetcher.fetch(url, staged.path())?;
        staged
            .persist(&destination)
            .map_err(|e| Error::filesystem(&destination, e.error))?;

        info!("Downloaded {} to {}", url, destination.display());
        Ok(DownloadOutcome::Downloaded(destination))
    }
}
