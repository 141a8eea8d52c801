use crate::error::FetchError;
use crate::runtime::Runtime;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extractor for the `.zip` bundles published per ABI.
pub struct ZipExtractor;

impl ZipExtractor {
    /// Unpack `archive_path` into `extract_to`, keeping the archive's layout.
    ///
    /// Entries whose path would land outside `extract_to` are skipped.
    /// Returns the extracted files.
    #[tracing::instrument(skip(self, runtime))]
    pub fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<Vec<PathBuf>, FetchError> {
        self.extract_impl(runtime, archive_path, extract_to)
            .map_err(|e| FetchError::ExtractFailed {
                path: archive_path.to_path_buf(),
                source: e.into(),
            })
    }

    fn extract_impl<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<Vec<PathBuf>> {
        debug!("Extracting zip archive to {:?}...", extract_to);
        let mut reader = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        // ZipArchive needs Read + Seek
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;
        let cursor = std::io::Cursor::new(buffer);

        let mut archive = ZipArchive::new(cursor).context("Failed to parse ZIP archive")?;
        if archive.len() == 0 {
            return Err(anyhow!("Archive appears to be empty."));
        }

        runtime.create_dir_all(extract_to)?;

        let mut extracted = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            let entry_path = match entry.enclosed_name() {
                Some(path) => path.to_path_buf(),
                None => {
                    debug!("Skipping entry with invalid path: {}", entry.name());
                    continue;
                }
            };

            let full_path = extract_to.join(&entry_path);

            if entry.is_dir() {
                runtime.create_dir_all(&full_path)?;
            } else {
                if let Some(parent) = full_path.parent() {
                    runtime.create_dir_all(parent)?;
                }
                let mut dest_file = runtime.create_file(&full_path)?;
                std::io::copy(&mut entry, &mut dest_file)
                    .with_context(|| format!("Failed to extract file {:?}", full_path))?;
                extracted.push(full_path);
            }
        }

        debug!("Extracted {} files", extracted.len());
        Ok(extracted)
    }
}
