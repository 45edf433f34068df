//! Page fetching over HTTP with the site's fixed headers and timeout.
//!
//! [`PageFetcher`] owns the single `reqwest::Client` used by the whole run.
//! The file downloader borrows the same client so every request carries the
//! same `User-Agent`, `Referer` and timeout.

mod error;

pub use error::FetchError;

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ScrapeConfig;

/// Fetches pages as text.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds the shared HTTP client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if a header value is not valid ASCII or
    /// the client builder fails.
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let client = build_client(config)?;
        Ok(Self { client })
    }

    /// Returns the underlying client for streaming downloads.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Performs a GET and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on an unparsable URL, transport failure,
    /// timeout, or non-2xx status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }
}

fn build_client(config: &ScrapeConfig) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(config.user_agent())
            .map_err(|e| FetchError::client(format!("invalid User-Agent: {e}")))?,
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer())
            .map_err(|e| FetchError::client(format!("invalid Referer: {e}")))?,
    );

    ClientBuilder::new()
        .default_headers(headers)
        // Bounds each connect and each read, not the whole body stream.
        .connect_timeout(config.timeout())
        .read_timeout(config.timeout())
        .gzip(true)
        .build()
        .map_err(|e| FetchError::client(e.to_string()))
}
