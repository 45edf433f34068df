//! Album Downloader Core Library
//!
//! Scrapes an album listing page, resolves each track's direct audio link and
//! downloads the files one at a time with retry and rate limiting.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Immutable run configuration (origin, headers, timeouts, retries)
//! - [`fetch`] - Page fetching with fixed headers and timeout
//! - [`tracklist`] - Track table parsing on the album page
//! - [`media`] - Media link extraction on track pages
//! - [`download`] - Streaming file downloads with sanitized names and retry
//! - [`failure`] - Failure classification shared by log lines
//! - [`pipeline`] - The sequential album run tying it all together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod failure;
pub mod fetch;
pub mod media;
pub mod pipeline;
pub mod tracklist;

// Re-export commonly used types
pub use config::ScrapeConfig;
pub use download::{DownloadError, DownloadedFile, FileDownloader, RetryPolicy, sanitize_filename};
pub use failure::FailureKind;
pub use fetch::{FetchError, PageFetcher};
pub use media::{MediaLinkResolver, MediaUrl, extract_media_url, is_valid_media_url};
pub use pipeline::{AlbumPipeline, PipelineError, RunSummary};
pub use tracklist::{TrackListError, TrackRow, TrackTable, parse_tracks};
