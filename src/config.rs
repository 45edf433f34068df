//! Immutable run configuration shared by every pipeline component.
//!
//! All site constants (origin, table id, headers, timeouts, retry counts) live
//! here and are threaded through constructors instead of being read globally.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

/// Origin that relative track and media links are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://downloads.khinsider.com";

/// `id` attribute of the album track table.
pub const DEFAULT_TABLE_ID: &str = "songlist";

/// Directory (relative to the working directory) that receives downloads.
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded";

/// Connect and per-read timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum download attempts per track, including the first.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay unit used for both the inter-download pause and retry backoff.
pub const DEFAULT_DELAY_SECS: u64 = 2;

/// Write buffer size for streamed downloads.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Required suffix of a direct media URL.
pub const MEDIA_EXTENSION: &str = ".mp3";

/// Path prefix of links that look like media but point at site pages.
pub const EXCLUDED_MEDIA_PREFIX: &str = "/cp";

/// Class of the table cell holding the track page anchor.
pub const TRACK_CELL_CLASS: &str = "clickable-row";

/// Class of the span marking the "download" button on a track page.
pub const DOWNLOAD_MARKER_CLASS: &str = "songDownloadLink";

/// Desktop browser User-Agent sent on every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for one scrape-and-download run.
///
/// `Default` carries the production constants; the `with_*` builders exist so
/// tests can point the pipeline at a mock server and shrink the delays.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    base_url: Url,
    table_id: String,
    download_dir: PathBuf,
    timeout: Duration,
    max_retries: u32,
    inter_download_delay: Duration,
    backoff_unit: Duration,
    user_agent: String,
}

impl Default for ScrapeConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            table_id: DEFAULT_TABLE_ID.to_string(),
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            inter_download_delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            backoff_unit: Duration::from_secs(DEFAULT_DELAY_SECS),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Overrides the origin used for link resolution and the `Referer` header.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Overrides the download directory.
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Overrides the connect and per-read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the attempt count (minimum 1).
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Overrides the pause after each download and the retry backoff unit.
    #[must_use]
    pub fn with_delays(mut self, inter_download: Duration, backoff_unit: Duration) -> Self {
        self.inter_download_delay = inter_download;
        self.backoff_unit = backoff_unit;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn inter_download_delay(&self) -> Duration {
        self.inter_download_delay
    }

    #[must_use]
    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// `Referer` header value: the base origin without a trailing slash.
    #[must_use]
    pub fn referer(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_site_constants() {
        let config = ScrapeConfig::default();
        assert_eq!(config.base_url().as_str(), "https://downloads.khinsider.com/");
        assert_eq!(config.table_id(), "songlist");
        assert_eq!(config.download_dir(), Path::new("downloaded"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.inter_download_delay(), Duration::from_secs(2));
        assert_eq!(config.backoff_unit(), Duration::from_secs(2));
        assert!(config.user_agent().contains("Chrome/91"));
    }

    #[test]
    fn test_referer_has_no_trailing_slash() {
        assert_eq!(
            ScrapeConfig::default().referer(),
            "https://downloads.khinsider.com"
        );
    }

    #[test]
    fn test_with_max_retries_floors_at_one() {
        let config = ScrapeConfig::default().with_max_retries(0);
        assert_eq!(config.max_retries(), 1);
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = ScrapeConfig::default()
            .with_base_url(Url::parse("http://127.0.0.1:9000").unwrap())
            .with_download_dir("/tmp/out")
            .with_delays(Duration::ZERO, Duration::from_millis(5));
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.download_dir(), Path::new("/tmp/out"));
        assert_eq!(config.inter_download_delay(), Duration::ZERO);
        assert_eq!(config.backoff_unit(), Duration::from_millis(5));
    }
}
