use scraper::{Html, Selector};
use thiserror::Error;

/// File links in the table layout used by the listing server.
pub const LISTING_ANCHOR_SELECTOR: &str = "tbody > tr > td.link > a";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("invalid anchor selector: {0}")]
    Selector(String),
    #[error("page contains no directory listing links")]
    NoAnchors,
}

/// Extracts anchor hrefs from a directory listing in document order.
///
/// The first href is the parent-directory link; callers drop it. An anchor
/// without an `href` keeps its position as an empty string so that the
/// parent link stays first.
pub fn parse_listing_anchors(html: &str) -> Result<Vec<String>, ListingError> {
    let selector = Selector::parse(LISTING_ANCHOR_SELECTOR)
        .map_err(|err| ListingError::Selector(err.to_string()))?;
    let document = Html::parse_document(html);

    let hrefs: Vec<String> = document
        .select(&selector)
        .map(|anchor| anchor.value().attr("href").unwrap_or_default().trim().to_string())
        .collect();

    if hrefs.is_empty() {
        return Err(ListingError::NoAnchors);
    }
    Ok(hrefs)
}
