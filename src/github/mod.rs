mod client;
mod repo;
mod types;

pub use client::{GitHub, ListReleases, DEFAULT_API_URL};
pub use repo::GitHubRepo;
pub use types::{Release, ReleaseAsset};

#[cfg(test)]
pub use client::MockListReleases;
