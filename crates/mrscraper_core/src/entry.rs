use crate::filter::is_accepted;
use crate::RunConfiguration;

/// One candidate file from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub href: String,
    /// URL-decoded trailing path segment of `href`.
    pub display_name: String,
}

impl CatalogEntry {
    pub fn from_href(href: impl Into<String>) -> Self {
        let href = href.into();
        let display_name = decode_segment(trailing_segment(&href));
        Self { href, display_name }
    }
}

/// Last `/`-separated segment of `href`, ignoring any query or fragment.
/// Directory hrefs (`sub/`) yield an empty segment.
pub fn trailing_segment(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/').next().unwrap_or(path)
}

/// Percent-decodes a path segment. `+` is left alone and invalid UTF-8 is
/// replaced rather than rejected.
pub fn decode_segment(segment: &str) -> String {
    let bytes = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Ordered entries that survived filtering. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredWorkList {
    entries: Vec<CatalogEntry>,
    examined: usize,
}

impl FilteredWorkList {
    /// Number of items the run will try to download.
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates looked at before filtering (after the parent link and limit).
    pub fn examined_count(&self) -> usize {
        self.examined
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.display_name.as_str())
            .collect()
    }
}

impl<'a> IntoIterator for &'a FilteredWorkList {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds the work list from listing hrefs in listing order.
///
/// The first href is the listing's parent-directory link and is always
/// dropped. `entry_limit` then caps how many of the remaining candidates are
/// examined.
pub fn build_work_list<I, S>(hrefs: I, config: &RunConfiguration) -> FilteredWorkList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let limit = config.entry_limit.unwrap_or(usize::MAX);
    let mut examined = 0;
    let entries: Vec<CatalogEntry> = hrefs
        .into_iter()
        .skip(1)
        .take(limit)
        .inspect(|_| examined += 1)
        .map(CatalogEntry::from_href)
        .filter(|entry| is_accepted(entry, config))
        .collect();

    FilteredWorkList { entries, examined }
}
