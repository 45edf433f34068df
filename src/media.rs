//! Track page parsing: find the direct media file link.
//!
//! A track page links its audio file in one of two ways. Usually one of the
//! page's anchors points straight at the `.mp3`; otherwise the download button
//! (a `span.songDownloadLink`) sits inside the anchor that does.

use std::fmt;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{DOWNLOAD_MARKER_CLASS, EXCLUDED_MEDIA_PREFIX, MEDIA_EXTENSION, ScrapeConfig};
use crate::fetch::PageFetcher;
use crate::tracklist::compile_selector;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_selector("a[href]"));
static MARKER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_selector(&format!("span.{DOWNLOAD_MARKER_CLASS}")));

/// A direct, absolute link to an audio file that passed [`is_valid_media_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl(String);

impl MediaUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `/`-separated segment, used as the suggested filename.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `url` is non-empty, ends with the media extension and does
/// not start with the excluded site-page prefix.
#[must_use]
pub fn is_valid_media_url(url: &str) -> bool {
    !url.is_empty() && url.ends_with(MEDIA_EXTENSION) && !url.starts_with(EXCLUDED_MEDIA_PREFIX)
}

/// Extracts the media link from track page markup.
///
/// Tries every anchor in document order first, then falls back to the anchor
/// enclosing the download button. Candidates are validated on the raw href
/// before being made absolute.
#[must_use]
pub fn extract_media_url(markup: &str, config: &ScrapeConfig) -> Option<MediaUrl> {
    let document = Html::parse_document(markup);

    let primary = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| is_valid_media_url(href));
    if let Some(href) = primary {
        return absolutize(href, config.base_url());
    }

    let marker = document.select(&MARKER_SELECTOR).next()?;
    let href = enclosing_anchor_href(marker)?;
    if !is_valid_media_url(href) {
        debug!(href, "download button link is not a media file");
        return None;
    }
    absolutize(href, config.base_url())
}

/// Nearest ancestor `<a>` that carries an `href`.
fn enclosing_anchor_href(element: ElementRef<'_>) -> Option<&str> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|ancestor| ancestor.value().name() == "a")
        .find_map(|anchor| anchor.value().attr("href"))
}

fn absolutize(href: &str, base_url: &Url) -> Option<MediaUrl> {
    if href.starts_with("http") {
        return Some(MediaUrl(href.to_string()));
    }
    base_url
        .join(href)
        .ok()
        .map(|url| MediaUrl(url.to_string()))
}

/// Fetches track pages and resolves their media links.
#[derive(Debug, Clone)]
pub struct MediaLinkResolver {
    fetcher: PageFetcher,
    config: ScrapeConfig,
}

impl MediaLinkResolver {
    #[must_use]
    pub fn new(fetcher: PageFetcher, config: ScrapeConfig) -> Self {
        Self { fetcher, config }
    }

    /// Resolves the media URL for a track page.
    ///
    /// A fetch failure is logged and reported as `None`, the same as a page
    /// with no qualifying link.
    #[instrument(skip(self), fields(url = %track_page_url))]
    pub async fn resolve(&self, track_page_url: &Url) -> Option<MediaUrl> {
        let markup = match self.fetcher.fetch(track_page_url.as_str()).await {
            Ok(markup) => markup,
            Err(error) => {
                warn!(error = %error, "Error getting MP3 URL");
                return None;
            }
        };

        let media_url = extract_media_url(&markup, &self.config);
        if let Some(url) = &media_url {
            debug!(media_url = %url, "resolved media link");
        }
        media_url
    }
}
