//! Media file downloads: validation, filename sanitization, streaming and retry.
//!
//! # Example
//!
//! ```no_run
//! use album_dl_core::ScrapeConfig;
//! use album_dl_core::download::FileDownloader;
//! use album_dl_core::fetch::PageFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScrapeConfig::default();
//! let fetcher = PageFetcher::new(&config)?;
//! let downloader = FileDownloader::new(fetcher.client().clone(), &config);
//! let ok = downloader
//!     .download("https://example.com/soundtracks/01%20Intro.mp3", "01%20Intro.mp3")
//!     .await;
//! println!("downloaded: {ok}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;
mod retry;

pub use client::{DownloadedFile, FileDownloader};
pub use error::DownloadError;
pub use filename::sanitize_filename;
pub use retry::{RetryDecision, RetryPolicy};
