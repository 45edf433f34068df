//! The album run: fetch the track list, then resolve and download each track.
//!
//! Rows are handled strictly one after another. A row that fails only costs
//! that row; the run itself stops early only when the album page cannot be
//! fetched or has no track table.

use std::fmt;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::ScrapeConfig;
use crate::download::FileDownloader;
use crate::failure::FailureKind;
use crate::fetch::{FetchError, PageFetcher};
use crate::media::MediaLinkResolver;
use crate::tracklist::{TrackListError, TrackRow, parse_tracks};

/// Errors that end the run before or instead of the download loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The album page (or the HTTP client) failed.
    #[error("Critical error: {0}")]
    Fetch(#[source] FetchError),

    /// The album page has no usable track table.
    #[error("{0}")]
    TrackList(#[source] TrackListError),

    /// The download directory could not be created.
    #[error("Critical error: could not create {path}: {source}")]
    Io {
        /// Directory that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        FailureKind::FatalToRun
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Tracks written to disk.
    pub succeeded: usize,
    /// Body rows in the track table.
    pub total: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done! Successfully downloaded {}/{} tracks",
            self.succeeded, self.total
        )
    }
}

/// What happened to one track row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOutcome {
    Downloaded,
    DownloadFailed,
    NoMediaLink,
}

/// Wires the fetcher, resolver and downloader together for one album.
#[derive(Debug)]
pub struct AlbumPipeline {
    config: ScrapeConfig,
    fetcher: PageFetcher,
    resolver: MediaLinkResolver,
    downloader: FileDownloader,
    show_progress: bool,
}

impl AlbumPipeline {
    /// Builds every component from one configuration. The progress bar is
    /// off until [`with_progress`](Self::with_progress) enables it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: ScrapeConfig) -> Result<Self, PipelineError> {
        let fetcher = PageFetcher::new(&config).map_err(PipelineError::Fetch)?;
        let resolver = MediaLinkResolver::new(fetcher.clone(), config.clone());
        let downloader = FileDownloader::new(fetcher.client().clone(), &config);
        Ok(Self {
            config,
            fetcher,
            resolver,
            downloader,
            show_progress: false,
        })
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Downloads every track of the album at `page_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the album page cannot be fetched, the
    /// track table is missing or empty, or the download directory cannot be
    /// created. Per-track failures are logged and only lower the count.
    #[instrument(skip(self))]
    pub async fn run(&self, page_url: &str) -> Result<RunSummary, PipelineError> {
        info!("Getting track list...");
        let markup = self
            .fetcher
            .fetch(page_url)
            .await
            .map_err(PipelineError::Fetch)?;

        let table = parse_tracks(&markup, &self.config).map_err(PipelineError::TrackList)?;
        info!(
            rows = table.row_count,
            linked = table.rows.len(),
            "Found {} tracks. Starting download...",
            table.row_count
        );

        let download_dir = self.downloader.download_dir();
        tokio::fs::create_dir_all(download_dir)
            .await
            .map_err(|source| PipelineError::Io {
                path: download_dir.to_path_buf(),
                source,
            })?;

        let progress = self.progress_bar(table.row_count);
        let mut succeeded = 0;
        for row in &table.rows {
            if self.process_row(row).await == RowOutcome::Downloaded {
                succeeded += 1;
            }
            progress.set_position(u64::try_from(row.position).unwrap_or(u64::MAX));
        }
        progress.finish_and_clear();

        Ok(RunSummary {
            succeeded,
            total: table.row_count,
        })
    }

    async fn process_row(&self, row: &TrackRow) -> RowOutcome {
        let Some(media_url) = self.resolver.resolve(&row.page_url).await else {
            warn!(
                position = row.position,
                kind = FailureKind::FatalToRow.label(),
                "MP3 link not found for {}",
                row.page_url
            );
            return RowOutcome::NoMediaLink;
        };

        let downloaded = self
            .downloader
            .download(media_url.as_str(), media_url.basename())
            .await;

        debug!(
            delay_ms = self.config.inter_download_delay().as_millis(),
            "pausing before next track"
        );
        tokio::time::sleep(self.config.inter_download_delay()).await;

        if downloaded {
            RowOutcome::Downloaded
        } else {
            RowOutcome::DownloadFailed
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
        bar.set_style(
            ProgressStyle::with_template("Downloading {wide_bar} {pos}/{len} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_summary_display() {
        let summary = RunSummary {
            succeeded: 1,
            total: 2,
        };
        assert_eq!(
            summary.to_string(),
            "Done! Successfully downloaded 1/2 tracks"
        );
    }

    #[test]
    fn test_track_list_error_message_passes_through() {
        let error = PipelineError::TrackList(TrackListError::NoTracks);
        assert_eq!(error.to_string(), "No tracks to download!");
        assert_eq!(error.kind(), FailureKind::FatalToRun);
    }

    #[test]
    fn test_fetch_error_is_critical() {
        let error = PipelineError::Fetch(FetchError::http_status("https://x.example/album", 500));
        assert_eq!(
            error.to_string(),
            "Critical error: HTTP 500 fetching https://x.example/album"
        );
    }
}
