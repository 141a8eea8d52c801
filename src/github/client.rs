use async_trait::async_trait;
use log::debug;
use reqwest::Url;

use crate::error::FetchError;
use crate::http::HttpClient;

use super::repo::GitHubRepo;
use super::types::Release;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListReleases: Send + Sync {
    async fn list_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>, FetchError>;
}

pub struct GitHub {
    pub http: HttpClient,
    pub api_url: String,
    pub force_https: bool,
}

impl GitHub {
    #[tracing::instrument(skip(http, api_url))]
    pub fn new(http: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http,
            api_url,
            force_https: true,
        }
    }

    /// Keep the API URL's scheme as given (plain-http mirrors, local test servers).
    pub fn allow_insecure(mut self) -> Self {
        self.force_https = false;
        self
    }

    pub fn releases_url(&self, repo: &GitHubRepo) -> String {
        let url = format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            repo.owner,
            repo.repo
        );
        if self.force_https {
            upgrade_to_https(&url)
        } else {
            url
        }
    }
}

#[async_trait]
impl ListReleases for GitHub {
    #[tracing::instrument(skip(self, repo))]
    async fn list_releases(&self, repo: &GitHubRepo) -> Result<Vec<Release>, FetchError> {
        let url = self.releases_url(repo);

        debug!("Fetching releases from {}...", url);

        self.http
            .get_json::<Vec<Release>>(&url)
            .await
            .map_err(|e| FetchError::ListingFailed {
                url: url.clone(),
                source: e.into(),
            })
    }
}

fn upgrade_to_https(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.scheme() == "http" => match parsed.set_scheme("https") {
            Ok(()) => parsed.to_string(),
            Err(()) => url.to_string(),
        },
        _ => url.to_string(),
    }
}
