//! Album page parsing: locate the track table and extract track page links.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{ScrapeConfig, TRACK_CELL_CLASS};

/// Errors that halt the run before any download starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackListError {
    /// No `<table>` carries the expected `id`.
    #[error("Table {table_id} not found!")]
    TableNotFound {
        /// The `id` that was searched for.
        table_id: String,
    },

    /// The table has a header row but no track rows.
    #[error("No tracks to download!")]
    NoTracks,
}

/// One row of the track table that links to a track detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    /// 1-based position among the table's body rows.
    pub position: usize,
    /// Absolute URL of the track detail page.
    pub page_url: Url,
}

/// Result of parsing the album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTable {
    /// Rows that carried a usable anchor, in table order.
    pub rows: Vec<TrackRow>,
    /// Number of body rows in the table, including rows without an anchor.
    pub row_count: usize,
}

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_selector("tr"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_selector("a[href]"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_selector(&format!("td.{TRACK_CELL_CLASS}")));

/// Compiles a selector at static init; panics on invalid pattern.
pub(crate) fn compile_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).unwrap_or_else(|e| panic!("invalid static selector '{pattern}': {e}"))
}

/// Parses album markup into the ordered list of track rows.
///
/// Track page hrefs are joined against the configured base origin, not the
/// album page URL.
///
/// # Errors
///
/// Returns [`TrackListError::TableNotFound`] when the table is missing and
/// [`TrackListError::NoTracks`] when it has no rows after the header.
pub fn parse_tracks(markup: &str, config: &ScrapeConfig) -> Result<TrackTable, TrackListError> {
    let document = Html::parse_document(markup);
    let not_found = || TrackListError::TableNotFound {
        table_id: config.table_id().to_string(),
    };

    let table_selector = table_selector(config.table_id()).ok_or_else(not_found)?;
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(not_found)?;

    let body_rows: Vec<ElementRef<'_>> = table.select(&ROW_SELECTOR).skip(1).collect();
    if body_rows.is_empty() {
        return Err(TrackListError::NoTracks);
    }

    let rows = body_rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let position = index + 1;
            let row = track_row(*row, position, config.base_url());
            if row.is_none() {
                debug!(position, "row has no track link; skipping");
            }
            row
        })
        .collect();

    Ok(TrackTable {
        rows,
        row_count: body_rows.len(),
    })
}

fn track_row(row: ElementRef<'_>, position: usize, base_url: &Url) -> Option<TrackRow> {
    let cell = row.select(&CELL_SELECTOR).next()?;
    let href = cell.select(&ANCHOR_SELECTOR).next()?.value().attr("href")?;
    let page_url = base_url.join(href).ok()?;
    Some(TrackRow { position, page_url })
}

// Attribute form tolerates ids that are not valid CSS identifiers.
fn table_selector(table_id: &str) -> Option<Selector> {
    Selector::parse(&format!("table[id=\"{table_id}\"]")).ok()
}
