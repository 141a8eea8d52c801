//! The fetch pipeline: list releases, pick the one for a version, pick the
//! asset for this device's ABI, stream it to disk.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::abi::{self, AbiDetector};
use crate::download::{self, ProgressListener};
use crate::error::FetchError;
use crate::github::{GitHubRepo, ListReleases, Release};
use crate::http::HttpClient;
use crate::runtime::Runtime;

pub const DEFAULT_TAG_PREFIX: &str = "libvlc-";

/// What a successful download wrote, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct Downloaded {
    pub tag: String,
    pub asset: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Locates and downloads the bundle built for this device.
///
/// Holds no per-call state; one instance can serve many calls. Concurrent
/// calls writing the same destination are not coordinated.
pub struct ArtifactFetcher<G: ListReleases, D: AbiDetector, R: Runtime> {
    source: G,
    detector: D,
    runtime: R,
    http: HttpClient,
    repo: GitHubRepo,
    tag_prefix: String,
}

impl<G: ListReleases, D: AbiDetector, R: Runtime> ArtifactFetcher<G, D, R> {
    pub fn new(source: G, detector: D, runtime: R, http: HttpClient, repo: GitHubRepo) -> Self {
        Self {
            source,
            detector,
            runtime,
            http,
            repo,
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
        }
    }

    pub fn with_tag_prefix(mut self, tag_prefix: impl Into<String>) -> Self {
        self.tag_prefix = tag_prefix.into();
        self
    }

    pub fn repo(&self) -> &GitHubRepo {
        &self.repo
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Tag a release of `version` is published under.
    pub fn release_tag(&self, version: &str) -> String {
        format!("{}{}", self.tag_prefix, version)
    }

    /// All releases in the order the server returned them.
    #[tracing::instrument(skip(self))]
    pub async fn list_releases(&self) -> Result<Vec<Release>, FetchError> {
        let releases = self.source.list_releases(&self.repo).await?;
        debug!("Found {} releases for {}", releases.len(), self.repo);
        Ok(releases)
    }

    /// Like [`list_releases`](Self::list_releases), but any failure yields an empty list.
    pub async fn list_releases_lenient(&self) -> Vec<Release> {
        self.list_releases().await.unwrap_or_else(|e| {
            warn!("Ignoring release listing failure: {}", e);
            Vec::new()
        })
    }

    /// The first release tagged for `version`, or `None` if it was never published.
    #[tracing::instrument(skip(self))]
    pub async fn find_release(&self, version: &str) -> Result<Option<Release>, FetchError> {
        if version.is_empty() {
            return Err(FetchError::InvalidVersion);
        }

        let tag = self.release_tag(version);
        let release = self
            .list_releases()
            .await?
            .into_iter()
            .find(|r| r.tag_name == tag);

        if release.is_none() {
            debug!("No release tagged {}", tag);
        }
        Ok(release)
    }

    /// ABIs reported by the injected detector.
    pub fn supported_abis(&self) -> Vec<String> {
        self.detector.supported_abis()
    }

    /// Asset name for this environment, `None` if no known ABI is supported.
    pub fn resolve_asset_name(&self) -> Option<String> {
        abi::resolve_asset_name(&self.detector.supported_abis())
    }

    /// Stream the asset of `release` built for this environment into `destination`.
    ///
    /// The destination is created or truncated only after the asset was found
    /// and the server accepted the request. On failure a partially written
    /// file is left for the caller to remove. Dropping the returned future
    /// cancels the transfer and closes both the connection and the file.
    #[tracing::instrument(skip(self, release, on_progress), fields(tag = %release.tag_name))]
    pub async fn download_asset<P>(
        &self,
        release: &Release,
        destination: &Path,
        on_progress: &mut P,
    ) -> Result<Downloaded, FetchError>
    where
        P: ProgressListener + ?Sized,
    {
        let supported = self.detector.supported_abis();
        let asset_name = abi::resolve_asset_name(&supported)
            .ok_or(FetchError::UnsupportedArchitecture { supported })?;

        let asset = abi::pick_asset(&release.assets, &asset_name).ok_or_else(|| {
            FetchError::AssetNotFound {
                asset: asset_name.clone(),
                tag: release.tag_name.clone(),
            }
        })?;

        info!("Selected asset {} from {}", asset.name, release.tag_name);

        let bytes = download::download_file(
            &self.runtime,
            &self.http,
            asset.download_url(),
            destination,
            on_progress,
        )
        .await?;

        Ok(Downloaded {
            tag: release.tag_name.clone(),
            asset: asset_name,
            path: destination.to_path_buf(),
            bytes,
        })
    }

    /// Find the release for `version` and download its asset to `destination`.
    pub async fn fetch<P>(
        &self,
        version: &str,
        destination: &Path,
        on_progress: &mut P,
    ) -> Result<Downloaded, FetchError>
    where
        P: ProgressListener + ?Sized,
    {
        let release =
            self.find_release(version)
                .await?
                .ok_or_else(|| FetchError::ReleaseNotFound {
                    tag: self.release_tag(version),
                })?;

        self.download_asset(&release, destination, on_progress)
            .await
    }
}
