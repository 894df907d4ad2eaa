//! # Download Command Implementation
//!
//! Fetches a single file into the local download cache with the system `curl`
//! command. A cached copy younger than the staleness window is reused without
//! touching the network.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use pipeline_lib_build::defaults;
use pipeline_lib_build::download::{CurlFetcher, DownloadCache, DownloadOutcome};

/// Download a file into the cache
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// URL to fetch.
    #[arg(long)]
    pub url: String,

    /// File name to store the download under.
    #[arg(long, value_name = "NAME")]
    pub file: String,

    /// Reuse a cached copy younger than this many hours.
    #[arg(
        long,
        value_name = "HOURS",
        default_value_t = defaults::DEFAULT_MAX_AGE.as_secs() / 3600
    )]
    pub max_age_hours: u64,

    /// The root directory for the download cache.
    ///
    /// If not provided, it defaults to the system's cache directory
    /// (e.g., `~/.cache/pipeline-lib-build` on Linux).
    #[arg(long, value_name = "DIR", env = "PIPELINE_LIB_CACHE")]
    pub cache_root: Option<PathBuf>,
}

/// Execute the `download` command.
pub fn execute(args: DownloadArgs) -> Result<()> {
    let max_age = args
        .max_age_hours
        .checked_mul(60 * 60)
        .map(Duration::from_secs)
        .with_context(|| format!("--max-age-hours {} is too large", args.max_age_hours))?;
    let root = args.cache_root.unwrap_or_else(defaults::default_cache_root);
    let cache = DownloadCache::new(root, max_age);

    match cache.fetch(&args.url, &args.file, &CurlFetcher)? {
        DownloadOutcome::Cached(path) => println!("Using cached {}", path.display()),
        DownloadOutcome::Downloaded(path) => println!("Downloaded {}", path.display()),
    }
    Ok(())
}
