//! Long-lived HTTP client shared by the release listing and the asset download.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;
use reqwest::header::{ACCEPT_ENCODING, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::io::Write;

use crate::download::ProgressListener;

use super::status::check_status;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Deflate preferred over gzip.
///
/// A compressed response is decoded transparently and loses its
/// Content-Length, so downloads of it report progress without a total.
pub const ACCEPT_ENCODING_VALUE: &str = "deflate;q=1.0, gzip;q=0.9";

/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client used for the lifetime of the process: browser-style
    /// user agent, weighted gzip/deflate negotiation, transparent decoding.
    pub fn with_defaults() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static(ACCEPT_ENCODING_VALUE),
        );

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client))
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let response = check_status(response)?;

        let result = response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")?;

        Ok(result)
    }

    /// Streams the body at `url` into the writer returned by `create_writer`.
    ///
    /// The writer is only created once the server answered with a success
    /// status. For every chunk the listener sees the running byte count before
    /// the chunk is written. Returns the number of bytes written.
    #[tracing::instrument(skip(self, create_writer, listener))]
    pub async fn download_file<W, F, P>(
        &self,
        url: &str,
        create_writer: F,
        listener: &mut P,
    ) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
        P: ProgressListener + ?Sized,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to start download request")?;

        let response = check_status(response)?;
        let total = response.content_length();

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read chunk from download stream")?;
            downloaded_bytes += chunk.len() as u64;
            listener.on_progress(downloaded_bytes, total);
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
        }

        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
