use crate::error::FetchError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::Context;
use log::info;
use std::path::Path;

/// Receives `(bytes_transferred, total_bytes)` while a download is streaming.
///
/// Called synchronously from the transfer loop, once per received chunk, with a
/// non-decreasing byte count. `total_bytes` is `None` when the server did not
/// announce a length, and also when the body arrives gzip or deflate encoded:
/// the count is of decoded bytes, which the wire length does not describe.
pub trait ProgressListener: Send {
    fn on_progress(&mut self, bytes_transferred: u64, total_bytes: Option<u64>);
}

impl<F> ProgressListener for F
where
    F: FnMut(u64, Option<u64>) + Send,
{
    fn on_progress(&mut self, bytes_transferred: u64, total_bytes: Option<u64>) {
        self(bytes_transferred, total_bytes)
    }
}

/// Listener that ignores all progress.
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn on_progress(&mut self, _bytes_transferred: u64, _total_bytes: Option<u64>) {}
}

/// Streams `url` into `destination`, creating or truncating it.
///
/// A failed transfer leaves whatever was written so far in place.
#[tracing::instrument(skip(runtime, http_client, listener))]
pub async fn download_file<R, P>(
    runtime: &R,
    http_client: &HttpClient,
    url: &str,
    destination: &Path,
    listener: &mut P,
) -> Result<u64, FetchError>
where
    R: Runtime,
    P: ProgressListener + ?Sized,
{
    info!("Downloading {} to {:?}...", url, destination);

    let bytes = http_client
        .download_file(
            url,
            || {
                runtime
                    .create_file(destination)
                    .with_context(|| format!("Failed to create file at {:?}", destination))
            },
            listener,
        )
        .await
        .map_err(|e| FetchError::transfer(url, e))?;

    info!("Download complete ({} bytes).", bytes);
    Ok(bytes)
}
