//! Fetches the native media library bundle matching a version and the
//! current device's CPU ABI from a GitHub release listing.

pub mod abi;
pub mod archive;
pub mod config;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod http;
pub mod runtime;

pub use error::FetchError;
pub use fetcher::{ArtifactFetcher, Downloaded};
