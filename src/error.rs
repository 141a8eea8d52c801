//! Typed failures of the fetch pipeline.
//!
//! Each variant maps to a different action for the user: install a build for
//! another device, pick another version, or check the network/disk and retry.

use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Version must not be empty")]
    InvalidVersion,

    #[error("Failed to list releases from {url}: {source}")]
    ListingFailed {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("No release tagged '{tag}' has been published")]
    ReleaseNotFound { tag: String },

    #[error("No bundle is built for this device (supported ABIs: {})", display_abis(.supported))]
    UnsupportedArchitecture { supported: Vec<String> },

    #[error("Release '{tag}' has no asset named '{asset}'")]
    AssetNotFound { asset: String, tag: String },

    #[error("Failed to download {url}: {source}")]
    TransferFailed {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to extract {}: {source}", .path.display())]
    ExtractFailed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl FetchError {
    /// Whether repeating the same call from scratch may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::ListingFailed { .. } | FetchError::TransferFailed { .. }
        )
    }

    pub(crate) fn transfer(url: &str, source: impl Into<BoxError>) -> Self {
        FetchError::TransferFailed {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

fn display_abis(abis: &[String]) -> String {
    if abis.is_empty() {
        "none reported".to_string()
    } else {
        abis.join(", ")
    }
}
