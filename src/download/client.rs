//! Streaming media downloader with bounded retries.
//!
//! [`FileDownloader`] validates the media URL, sanitizes the suggested name,
//! then streams the response body into the download directory. Each attempt
//! truncates the destination, so only the successful attempt's bytes remain.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::error::DownloadError;
use super::filename::sanitize_filename;
use super::retry::{RetryDecision, RetryPolicy};
use crate::config::{DOWNLOAD_CHUNK_SIZE, ScrapeConfig};
use crate::failure::classify_download_error;
use crate::media::is_valid_media_url;

/// A media file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Sanitized filename inside the download directory.
    pub filename: String,
    /// Full output path.
    pub path: PathBuf,
    /// Bytes written by the successful attempt.
    pub bytes: u64,
}

/// Downloads media files into one directory.
///
/// Shares the page fetcher's client, so downloads carry the same headers and
/// timeout as page requests.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    client: Client,
    download_dir: PathBuf,
    policy: RetryPolicy,
}

impl FileDownloader {
    #[must_use]
    pub fn new(client: Client, config: &ScrapeConfig) -> Self {
        Self {
            client,
            download_dir: config.download_dir().to_path_buf(),
            policy: RetryPolicy::new(config.max_retries(), config.backoff_unit()),
        }
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Downloads `media_url`, reporting only whether a file was written.
    ///
    /// Failures are logged here and never propagate.
    pub async fn download(&self, media_url: &str, suggested_filename: &str) -> bool {
        match self.download_file(media_url, suggested_filename).await {
            Ok(file) => {
                info!(path = %file.path.display(), bytes = file.bytes, "Success: {}", file.filename);
                true
            }
            Err(error @ DownloadError::InvalidMediaUrl { .. }) => {
                warn!(kind = classify_download_error(&error).label(), "{error}");
                false
            }
            Err(error) => {
                warn!(
                    kind = classify_download_error(&error).label(),
                    error = %error,
                    "download failed"
                );
                false
            }
        }
    }

    /// Downloads `media_url` into the download directory under the sanitized
    /// form of `suggested_filename`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidMediaUrl`] or
    /// [`DownloadError::EmptyFilename`] without making a request, and
    /// [`DownloadError::RetriesExhausted`] once every attempt has failed.
    #[instrument(skip(self), fields(url = %media_url))]
    pub async fn download_file(
        &self,
        media_url: &str,
        suggested_filename: &str,
    ) -> Result<DownloadedFile, DownloadError> {
        if !is_valid_media_url(media_url) {
            return Err(DownloadError::invalid_media_url(media_url));
        }

        let filename = sanitize_filename(suggested_filename);
        if filename.is_empty() {
            return Err(DownloadError::empty_filename(media_url));
        }
        let path = self.download_dir.join(&filename);
        let max_attempts = self.policy.max_attempts();

        let mut attempt = 1;
        loop {
            match self.attempt(media_url, &path).await {
                Ok(bytes) => {
                    return Ok(DownloadedFile {
                        filename,
                        path,
                        bytes,
                    });
                }
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts,
                        "Attempt {attempt}/{max_attempts} for {filename}: {error}"
                    );
                    match self.policy.should_retry(attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            tokio::time::sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(reason, "giving up");
                            return Err(DownloadError::retries_exhausted(
                                media_url, attempt, error,
                            ));
                        }
                    }
                }
            }
        }
    }

    /// One GET streamed to `path`. A failed stream removes the partial file.
    async fn attempt(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let result = stream_to_file(file, response, url, path).await;
        if result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        result
    }
}

async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::from_reqwest(url, e))?;
        if chunk.is_empty() {
            continue;
        }
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    fn downloader(dir: &Path) -> FileDownloader {
        let config = ScrapeConfig::default()
            .with_download_dir(dir)
            .with_delays(Duration::ZERO, Duration::from_millis(1));
        FileDownloader::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_download_rejects_invalid_url_without_request() {
        let temp_dir = TempDir::new().unwrap();
        let result = downloader(temp_dir.path())
            .download_file("/cp/playlist.mp3", "playlist.mp3")
            .await;
        assert!(matches!(result, Err(DownloadError::InvalidMediaUrl { .. })));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_bool_contract_is_false_on_rejection() {
        let temp_dir = TempDir::new().unwrap();
        let ok = downloader(temp_dir.path())
            .download("https://cdn.example/track.flac", "track.flac")
            .await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_download_rejects_empty_filename() {
        let temp_dir = TempDir::new().unwrap();
        let result = downloader(temp_dir.path())
            .download_file("https://cdn.example/a.mp3", "")
            .await;
        assert!(matches!(result, Err(DownloadError::EmptyFilename { .. })));
    }
}
