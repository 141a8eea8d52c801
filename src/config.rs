use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::{
    abi::{AbiDetector, DefaultAbiDetector, StaticAbiDetector},
    fetcher::{ArtifactFetcher, DEFAULT_TAG_PREFIX},
    github::{GitHub, GitHubRepo},
    http::HttpClient,
    runtime::Runtime,
};

pub const DEFAULT_REPO: &str = "aaa1115910/bv-libs";

/// User-facing knobs, usually filled from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub api_url: Option<String>,
    pub repo: GitHubRepo,
    pub tag_prefix: String,
    /// Overrides ABI detection when not empty.
    pub abis: Vec<String>,
    /// Keep a plain `http://` API URL instead of upgrading it.
    pub allow_insecure: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            api_url: None,
            repo: GitHubRepo {
                owner: "aaa1115910".to_string(),
                repo: "bv-libs".to_string(),
            },
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            abis: Vec::new(),
            allow_insecure: false,
        }
    }
}

/// Everything a fetch needs, built once at startup.
///
/// The HTTP client created here is the only one; the release source and the
/// downloader share it.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub http: HttpClient,
    pub github: GitHub,
    pub detector: StaticAbiDetector,
    pub repo: GitHubRepo,
    pub tag_prefix: String,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, options: FetchOptions) -> Result<Self> {
        let http = HttpClient::with_defaults()?;

        let mut github = GitHub::new(http.clone(), options.api_url);
        if options.allow_insecure {
            github = github.allow_insecure();
        }

        let detector = if options.abis.is_empty() {
            StaticAbiDetector::new(DefaultAbiDetector.supported_abis())
        } else {
            debug!("Using ABI override: {:?}", options.abis);
            StaticAbiDetector::new(options.abis)
        };

        Ok(Self {
            runtime,
            http,
            github,
            detector,
            repo: options.repo,
            tag_prefix: options.tag_prefix,
        })
    }

    pub fn into_fetcher(self) -> ArtifactFetcher<GitHub, StaticAbiDetector, R> {
        ArtifactFetcher::new(
            self.github,
            self.detector,
            self.runtime,
            self.http,
            self.repo,
        )
        .with_tag_prefix(self.tag_prefix)
    }
}

/// Where downloads go when no output path is given.
pub fn default_download_dir() -> Result<PathBuf> {
    let cache = dirs::cache_dir().context("Could not determine the user cache directory")?;
    Ok(cache.join("abifetch"))
}
